use crate::domain::envelope::ProbeSlot;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Card,
    Token,
}

impl WidgetKind {
    pub fn form_name(&self) -> &'static str {
        match self {
            WidgetKind::Card => "card form",
            WidgetKind::Token => "token form",
        }
    }

    pub fn mount_slot(&self) -> ProbeSlot {
        match self {
            WidgetKind::Card => ProbeSlot::CardMount,
            WidgetKind::Token => ProbeSlot::TokenMount,
        }
    }

    pub fn outcome_slot(&self) -> ProbeSlot {
        match self {
            WidgetKind::Card => ProbeSlot::CardOutcome,
            WidgetKind::Token => ProbeSlot::TokenOutcome,
        }
    }

    /// Identifier of a successful interaction result.
    ///
    /// Card payments report `{ id, .. }`, tokenization reports
    /// `{ token: { id, .. }, .. }`.
    pub fn result_id<'a>(&self, result: &'a Value) -> Option<&'a str> {
        match self {
            WidgetKind::Card => result.get("id").and_then(Value::as_str),
            WidgetKind::Token => result
                .get("token")
                .and_then(|token| token.get("id"))
                .and_then(Value::as_str),
        }
    }

    pub fn success_message(&self, id: &str) -> String {
        match self {
            WidgetKind::Card => format!("Card payment completed. ID: {id}"),
            WidgetKind::Token => format!("Token created. ID: {id}"),
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetKind::Card => f.write_str("Card payment"),
            WidgetKind::Token => f.write_str("Tokenization"),
        }
    }
}

/// What the end user did with a mounted widget.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetOutcome {
    Succeeded(Value),
    Failed(String),
    Cancelled,
}

/// Lifecycle of a mount session that has not reached a terminal state yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Requested,
    Mounted,
}

/// The `{on_success, on_error, on_cancel}` triple handed to a widget mount.
///
/// Each hook consumes the value, so a client can report at most one outcome
/// per mount.
pub struct OutcomeCallbacks {
    sink: Box<dyn FnOnce(WidgetOutcome) + Send>,
}

impl OutcomeCallbacks {
    pub fn new(sink: impl FnOnce(WidgetOutcome) + Send + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    pub fn on_success(self, result: Value) {
        self.deliver(WidgetOutcome::Succeeded(result));
    }

    pub fn on_error(self, error: impl Into<String>) {
        self.deliver(WidgetOutcome::Failed(error.into()));
    }

    pub fn on_cancel(self) {
        self.deliver(WidgetOutcome::Cancelled);
    }

    pub fn deliver(self, outcome: WidgetOutcome) {
        (self.sink)(outcome)
    }
}

impl fmt::Debug for OutcomeCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutcomeCallbacks").finish_non_exhaustive()
    }
}
