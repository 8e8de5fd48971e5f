use super::bridge::WidgetOutcomeBridge;
use super::lifecycle::{ClientState, SdkLifecycleManager};
use crate::domain::config::{Config, ConfigStore};
use crate::domain::envelope::{ProbeSlot, ResultBoard, ResultEnvelope};
use crate::domain::log::LogBus;
use crate::domain::payment::{FormParams, IntentParams};
use crate::domain::ports::{
    ClientFactoryBox, ConfigEndpointBox, ConfigLookup, EndpointResponse, MountSurfacesHandle,
};
use crate::domain::widget::{SessionPhase, WidgetKind};
use crate::error::{FetchFailure, HarnessError, Result};
use std::fmt;

/// The closed set of operations the harness can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Initialize,
    PaymentIntent,
    CardWidget { target: String },
    TokenWidget { target: String },
    Cors,
}

impl Probe {
    pub fn slot(&self) -> ProbeSlot {
        match self {
            Probe::Initialize => ProbeSlot::Initialize,
            Probe::PaymentIntent => ProbeSlot::PaymentIntent,
            Probe::CardWidget { .. } => WidgetKind::Card.mount_slot(),
            Probe::TokenWidget { .. } => WidgetKind::Token.mount_slot(),
            Probe::Cors => ProbeSlot::Cors,
        }
    }

    /// Everything except initialization needs a `Ready` client.
    pub fn requires_ready(&self) -> bool {
        !matches!(self, Probe::Initialize)
    }
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Probe::Initialize => f.write_str("initialize"),
            Probe::PaymentIntent => f.write_str("payment-intent"),
            Probe::CardWidget { target } => write!(f, "card-widget({target})"),
            Probe::TokenWidget { target } => write!(f, "token-widget({target})"),
            Probe::Cors => f.write_str("cors"),
        }
    }
}

/// Runs probes against the underlying client.
///
/// Every probe goes through [`ProbeOrchestrator::run`]: an info entry naming
/// the probe, gate check, execution, then one resolution entry and one
/// result-board update carrying the same message as the returned envelope.
/// Probes never fail to their caller; every error ends up inside the envelope.
pub struct ProbeOrchestrator {
    config: ConfigStore,
    lifecycle: SdkLifecycleManager,
    bridge: WidgetOutcomeBridge,
    endpoint: ConfigEndpointBox,
    log: LogBus,
    results: ResultBoard,
}

impl ProbeOrchestrator {
    pub fn new(
        factory: ClientFactoryBox,
        endpoint: ConfigEndpointBox,
        surfaces: MountSurfacesHandle,
    ) -> Self {
        let log = LogBus::new();
        let results = ResultBoard::new();
        Self {
            config: ConfigStore::default(),
            lifecycle: SdkLifecycleManager::new(factory),
            bridge: WidgetOutcomeBridge::new(surfaces, log.clone(), results.clone()),
            endpoint,
            log,
            results,
        }
    }

    pub fn with_config(self, config: Config) -> Self {
        self.config.set(config);
        self
    }

    pub async fn run(&self, probe: Probe) -> ResultEnvelope {
        tracing::info!(%probe, "starting probe");
        self.log.info(format!("Starting {probe}"));
        let config = self.config.get();

        let envelope = match self.execute(&probe, &config).await {
            Ok(envelope) => {
                self.log.success(envelope.message());
                envelope
            }
            // A local short-circuit, not a client failure.
            Err(HarnessError::Gate) => {
                let envelope = ResultEnvelope::from(HarnessError::Gate);
                self.log.info(envelope.message());
                envelope
            }
            Err(e) => {
                let envelope = ResultEnvelope::from(e);
                self.log.error(envelope.message());
                envelope
            }
        };

        tracing::debug!(%probe, success = envelope.is_success(), "probe settled");
        self.results.publish(probe.slot(), envelope.clone());
        envelope
    }

    async fn execute(&self, probe: &Probe, config: &Config) -> Result<ResultEnvelope> {
        let client = if probe.requires_ready() {
            Some(self.lifecycle.ready_client().await?)
        } else {
            None
        };

        match (probe, client) {
            (Probe::Initialize, _) => self
                .lifecycle
                .try_initialize(config)
                .await
                .map(ResultEnvelope::ok),
            (_, None) => Err(HarnessError::Gate),
            (Probe::PaymentIntent, Some(client)) => {
                let intent = client
                    .create_payment_intent(IntentParams::test_intent(config))
                    .await?;
                let message = format!("Payment intent created successfully. ID: {}", intent.id);
                Ok(ResultEnvelope::ok(message).with_data(serde_json::to_value(&intent)?))
            }
            (Probe::CardWidget { target }, Some(client)) => {
                self.bridge
                    .mount(
                        client.as_ref(),
                        WidgetKind::Card,
                        FormParams::test_form(config, target.as_str()),
                    )
                    .await
            }
            (Probe::TokenWidget { target }, Some(client)) => {
                self.bridge
                    .mount(
                        client.as_ref(),
                        WidgetKind::Token,
                        FormParams::test_form(config, target.as_str()),
                    )
                    .await
            }
            (Probe::Cors, Some(_)) => {
                let lookup = ConfigLookup {
                    business_id: config.business_id.clone(),
                    publishable_key: config.publishable_key.clone(),
                    sdk_token: config.effective_sdk_token().to_string(),
                };
                classify_cors(self.endpoint.fetch(&lookup).await)
            }
        }
    }

    pub async fn initialize(&self) -> ResultEnvelope {
        self.run(Probe::Initialize).await
    }

    pub async fn test_payment_intent(&self) -> ResultEnvelope {
        self.run(Probe::PaymentIntent).await
    }

    pub async fn mount_card_widget(&self, target: &str) -> ResultEnvelope {
        self.run(Probe::CardWidget {
            target: target.to_string(),
        })
        .await
    }

    pub async fn mount_token_widget(&self, target: &str) -> ResultEnvelope {
        self.run(Probe::TokenWidget {
            target: target.to_string(),
        })
        .await
    }

    pub async fn check_cors(&self) -> ResultEnvelope {
        self.run(Probe::Cors).await
    }

    pub fn set_config(&self, config: Config) {
        self.config.set(config);
    }

    pub fn config(&self) -> Config {
        self.config.get()
    }

    pub async fn is_ready(&self) -> bool {
        self.lifecycle.is_ready().await
    }

    pub async fn state(&self) -> ClientState {
        self.lifecycle.state().await
    }

    pub fn clear_surface(&self, target: &str) {
        self.bridge.clear_surface(target);
    }

    pub fn session_phase(&self, target: &str) -> Option<SessionPhase> {
        self.bridge.session_phase(target)
    }

    pub fn clear_log(&self) {
        self.log.clear();
    }

    /// Drops the client, every surface and pending session, and the result
    /// board. The activity log is left alone.
    pub async fn reset(&self) {
        self.lifecycle.reset().await;
        self.bridge.clear_all();
        self.results.clear();
    }

    pub fn log(&self) -> &LogBus {
        &self.log
    }

    pub fn results(&self) -> &ResultBoard {
        &self.results
    }
}

/// Classifies the outcome of the config-lookup request.
///
/// A failure without a response is a CORS-policy failure when its text
/// mentions "CORS" or "cross-origin" (any case), otherwise a network failure.
pub fn classify_cors(
    outcome: std::result::Result<EndpointResponse, FetchFailure>,
) -> Result<ResultEnvelope> {
    match outcome {
        Ok(response) if response.is_ok() => {
            let envelope = ResultEnvelope::ok(format!(
                "CORS check passed (HTTP {})",
                response.status
            ));
            Ok(match response.body {
                Some(body) => envelope.with_data(body),
                None => envelope,
            })
        }
        Ok(response) => Err(HarnessError::HttpStatus(response.status)),
        Err(FetchFailure(text)) => {
            let lowered = text.to_lowercase();
            if lowered.contains("cors") || lowered.contains("cross-origin") {
                Err(HarnessError::Policy(text))
            } else {
                Err(HarnessError::Network(text))
            }
        }
    }
}
