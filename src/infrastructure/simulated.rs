//! An in-process stand-in for the payment SDK.
//!
//! Behaviour is scripted through a [`SimulationPlan`]. Widget mounts park their
//! callbacks in a shared [`WidgetDriver`], which plays the end user: tests and
//! the CLI decide when, and how, each widget is resolved.

use crate::domain::config::SdkConfig;
use crate::domain::payment::{FormParams, IntentParams, PaymentIntent};
use crate::domain::ports::{ClientFactory, PaymentClient, PaymentClientHandle};
use crate::domain::widget::{OutcomeCallbacks, WidgetKind, WidgetOutcome};
use crate::error::ClientError;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Failures the simulated SDK should report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationPlan {
    pub construction_error: Option<String>,
    pub intent_error: Option<String>,
    pub mount_error: Option<String>,
}

/// What the simulated end user does with a mounted widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Complete,
    Fail(String),
    Cancel,
}

/// A mounted widget waiting for its end user.
#[derive(Debug)]
pub struct PendingWidget {
    pub selector: String,
    pub kind: WidgetKind,
    result: Value,
    callbacks: OutcomeCallbacks,
}

impl PendingWidget {
    pub fn complete(self) {
        self.callbacks.on_success(self.result);
    }

    pub fn fail(self, reason: impl Into<String>) {
        self.callbacks.on_error(reason);
    }

    pub fn cancel(self) {
        self.callbacks.on_cancel();
    }

    pub fn act(self, action: UserAction) {
        let outcome = match action {
            UserAction::Complete => WidgetOutcome::Succeeded(self.result),
            UserAction::Fail(reason) => WidgetOutcome::Failed(reason),
            UserAction::Cancel => WidgetOutcome::Cancelled,
        };
        self.callbacks.deliver(outcome);
    }
}

/// Shared queue of mounted widgets, in mount order.
#[derive(Debug, Clone, Default)]
pub struct WidgetDriver {
    pending: Arc<Mutex<Vec<PendingWidget>>>,
}

impl WidgetDriver {
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    /// Oldest pending widget mounted on `selector`.
    pub fn take(&self, selector: &str) -> Option<PendingWidget> {
        let mut pending = self.pending.lock();
        let index = pending.iter().position(|w| w.selector == selector)?;
        Some(pending.remove(index))
    }

    pub fn drain(&self) -> Vec<PendingWidget> {
        std::mem::take(&mut *self.pending.lock())
    }

    fn park(&self, widget: PendingWidget) {
        self.pending.lock().push(widget);
    }
}

pub struct SimulatedClient {
    config: SdkConfig,
    plan: SimulationPlan,
    driver: WidgetDriver,
    sequence: AtomicU64,
    invocations: Arc<AtomicU64>,
}

impl SimulatedClient {
    fn next_id(&self, prefix: &str) -> String {
        let n = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{prefix}_sim_{n:04}")
    }

    fn mount(
        &self,
        kind: WidgetKind,
        params: FormParams,
        callbacks: OutcomeCallbacks,
    ) -> Result<(), ClientError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.plan.mount_error {
            return Err(ClientError::new(message.clone()));
        }
        let result = match kind {
            WidgetKind::Card => json!({
                "id": self.next_id("pay"),
                "status": "succeeded",
                "amount": params.amount,
                "currency": params.currency,
                "business_id": self.config.business_id,
            }),
            WidgetKind::Token => json!({
                "token": { "id": self.next_id("tok"), "type": "card" },
                "business_id": self.config.business_id,
            }),
        };
        self.driver.park(PendingWidget {
            selector: params.selector,
            kind,
            result,
            callbacks,
        });
        Ok(())
    }
}

#[async_trait]
impl PaymentClient for SimulatedClient {
    async fn create_payment_intent(
        &self,
        params: IntentParams,
    ) -> Result<PaymentIntent, ClientError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.plan.intent_error {
            return Err(ClientError::new(message.clone()));
        }
        Ok(PaymentIntent {
            id: self.next_id("pi"),
            amount: params.amount,
            currency: params.currency,
            status: "requires_payment_method".to_string(),
        })
    }

    async fn mount_card_form(
        &self,
        params: FormParams,
        callbacks: OutcomeCallbacks,
    ) -> Result<(), ClientError> {
        self.mount(WidgetKind::Card, params, callbacks)
    }

    async fn mount_token_form(
        &self,
        params: FormParams,
        callbacks: OutcomeCallbacks,
    ) -> Result<(), ClientError> {
        self.mount(WidgetKind::Token, params, callbacks)
    }
}

/// Builds [`SimulatedClient`]s that all share one [`WidgetDriver`].
#[derive(Debug, Clone, Default)]
pub struct SimulatedClientFactory {
    plan: SimulationPlan,
    driver: WidgetDriver,
    constructed: Arc<AtomicU64>,
    invocations: Arc<AtomicU64>,
}

impl SimulatedClientFactory {
    pub fn new(plan: SimulationPlan) -> Self {
        Self {
            plan,
            ..Default::default()
        }
    }

    pub fn driver(&self) -> WidgetDriver {
        self.driver.clone()
    }

    /// Number of successful constructions so far.
    pub fn constructed(&self) -> u64 {
        self.constructed.load(Ordering::SeqCst)
    }

    /// Calls made on any client this factory built.
    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientFactory for SimulatedClientFactory {
    async fn create(&self, config: &SdkConfig) -> Result<PaymentClientHandle, ClientError> {
        if let Some(message) = &self.plan.construction_error {
            return Err(ClientError::new(message.clone()));
        }
        self.constructed.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(SimulatedClient {
            config: config.clone(),
            plan: self.plan.clone(),
            driver: self.driver.clone(),
            sequence: AtomicU64::new(0),
            invocations: Arc::clone(&self.invocations),
        }))
    }
}
