use crate::domain::widget::WidgetKind;
use thiserror::Error;

/// A failure reported by the payment client itself.
///
/// The message is kept verbatim so it can be surfaced to the integrator
/// exactly as the SDK produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ClientError {
    message: String,
}

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A request that failed before any HTTP response was received.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct FetchFailure(pub String);

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Missing {0}")]
    Configuration(&'static str),
    #[error("Please initialize the SDK first")]
    Gate,
    #[error(transparent)]
    Underlying(#[from] ClientError),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Blocked by CORS policy: {0}")]
    Policy(String),
    #[error("CORS check failed with HTTP status {0}")]
    HttpStatus(u16),
    #[error("Mount target '{0}' not found")]
    MountTarget(String),
    #[error("Failed to mount {}: {reason}", .widget.form_name())]
    Mount {
        widget: WidgetKind,
        reason: ClientError,
    },
    #[error("{widget} failed: {reason}")]
    Interaction { widget: WidgetKind, reason: String },
    #[error("{0} cancelled by user")]
    InteractionCancelled(WidgetKind),
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(rust_decimal::Decimal),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
