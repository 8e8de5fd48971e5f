#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use payprobe::application::orchestrator::ProbeOrchestrator;
use payprobe::domain::config::Config;
use payprobe::domain::ports::{ConfigEndpoint, ConfigLookup, EndpointResponse};
use payprobe::error::FetchFailure;
use payprobe::infrastructure::in_memory::InMemorySurfaces;
use payprobe::infrastructure::simulated::{SimulatedClientFactory, SimulationPlan, WidgetDriver};
use std::sync::Arc;

pub const CARD_SURFACE: &str = "card-element";
pub const TOKEN_SURFACE: &str = "token-element";

/// Endpoint that replays a fixed answer and records every lookup.
#[derive(Clone)]
pub struct ScriptedEndpoint {
    answer: std::result::Result<EndpointResponse, FetchFailure>,
    pub lookups: Arc<Mutex<Vec<ConfigLookup>>>,
}

impl ScriptedEndpoint {
    pub fn status(status: u16) -> Self {
        Self::answer(Ok(EndpointResponse { status, body: None }))
    }

    pub fn failure(text: &str) -> Self {
        Self::answer(Err(FetchFailure(text.to_string())))
    }

    fn answer(answer: std::result::Result<EndpointResponse, FetchFailure>) -> Self {
        Self {
            answer,
            lookups: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ConfigEndpoint for ScriptedEndpoint {
    async fn fetch(
        &self,
        lookup: &ConfigLookup,
    ) -> std::result::Result<EndpointResponse, FetchFailure> {
        self.lookups.lock().push(lookup.clone());
        self.answer.clone()
    }
}

pub struct TestHarness {
    pub probes: ProbeOrchestrator,
    pub factory: SimulatedClientFactory,
    pub driver: WidgetDriver,
    pub surfaces: Arc<InMemorySurfaces>,
    pub endpoint: ScriptedEndpoint,
}

pub fn valid_config() -> Config {
    Config::new("pk_test_1", "b1")
}

pub fn harness() -> TestHarness {
    harness_with(SimulationPlan::default(), ScriptedEndpoint::status(200))
}

pub fn harness_with(plan: SimulationPlan, endpoint: ScriptedEndpoint) -> TestHarness {
    let factory = SimulatedClientFactory::new(plan);
    let driver = factory.driver();
    let surfaces = Arc::new(InMemorySurfaces::with_surfaces([CARD_SURFACE, TOKEN_SURFACE]));
    let probes = ProbeOrchestrator::new(
        Box::new(factory.clone()),
        Box::new(endpoint.clone()),
        surfaces.clone(),
    )
    .with_config(valid_config());

    TestHarness {
        probes,
        factory,
        driver,
        surfaces,
        endpoint,
    }
}

/// A harness that has already passed initialization.
pub async fn ready_harness() -> TestHarness {
    let harness = harness();
    let envelope = harness.probes.initialize().await;
    assert!(envelope.is_success(), "initialize failed: {}", envelope.message());
    harness
}
