use crate::error::HarnessError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;

const RESULT_CHANNEL_CAPACITY: usize = 64;

/// The uniform result every probe produces.
///
/// Envelopes are terminal: once built they are only read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    success: bool,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl ResultEnvelope {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

impl From<HarnessError> for ResultEnvelope {
    fn from(err: HarnessError) -> Self {
        Self::failed(err.to_string())
    }
}

/// Per-probe result slot. Widget probes own two: the mount attempt and the
/// later interaction outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeSlot {
    Initialize,
    PaymentIntent,
    CardMount,
    CardOutcome,
    TokenMount,
    TokenOutcome,
    Cors,
}

impl fmt::Display for ProbeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProbeSlot::Initialize => "initialize",
            ProbeSlot::PaymentIntent => "payment_intent",
            ProbeSlot::CardMount => "card_mount",
            ProbeSlot::CardOutcome => "card_outcome",
            ProbeSlot::TokenMount => "token_mount",
            ProbeSlot::TokenOutcome => "token_outcome",
            ProbeSlot::Cors => "cors",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishedResult {
    pub slot: ProbeSlot,
    pub envelope: ResultEnvelope,
}

struct BoardInner {
    latest: RwLock<HashMap<ProbeSlot, ResultEnvelope>>,
    events: broadcast::Sender<PublishedResult>,
}

/// Latest envelope per slot, plus a broadcast of every envelope as it lands.
///
/// Slots are last-resolved-wins: when two probes for the same slot overlap,
/// whichever finishes later is what [`ResultBoard::latest`] returns.
#[derive(Clone)]
pub struct ResultBoard {
    inner: Arc<BoardInner>,
}

impl Default for ResultBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultBoard {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(RESULT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(BoardInner {
                latest: RwLock::new(HashMap::new()),
                events,
            }),
        }
    }

    pub fn publish(&self, slot: ProbeSlot, envelope: ResultEnvelope) {
        self.inner.latest.write().insert(slot, envelope.clone());
        // No subscribers is fine.
        let _ = self.inner.events.send(PublishedResult { slot, envelope });
    }

    pub fn latest(&self, slot: ProbeSlot) -> Option<ResultEnvelope> {
        self.inner.latest.read().get(&slot).cloned()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PublishedResult> {
        self.inner.events.subscribe()
    }

    pub fn clear(&self) {
        self.inner.latest.write().clear();
    }
}
