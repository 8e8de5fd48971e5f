use chrono::Local;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "INFO",
            Severity::Success => "SUCCESS",
            Severity::Error => "ERROR",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub message: String,
    pub severity: Severity,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.timestamp, self.severity, self.message)
    }
}

/// Append-only activity log shared by the orchestrator and the widget bridge.
///
/// Entries are stamped while the write lock is held, so insertion order and
/// timestamp order agree. Every append is mirrored as a `tracing` event.
#[derive(Debug, Clone, Default)]
pub struct LogBus {
    entries: Arc<RwLock<Vec<LogEntry>>>,
}

impl LogBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, message: impl Into<String>, severity: Severity) -> LogEntry {
        let message = message.into();
        match severity {
            Severity::Info => tracing::info!(target: "payprobe::activity", "{message}"),
            Severity::Success => tracing::info!(target: "payprobe::activity", outcome = "success", "{message}"),
            Severity::Error => tracing::warn!(target: "payprobe::activity", "{message}"),
        }

        let mut entries = self.entries.write();
        let entry = LogEntry {
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
            message,
            severity,
        };
        entries.push(entry.clone());
        entry
    }

    pub fn info(&self, message: impl Into<String>) -> LogEntry {
        self.append(message, Severity::Info)
    }

    pub fn success(&self, message: impl Into<String>) -> LogEntry {
        self.append(message, Severity::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> LogEntry {
        self.append(message, Severity::Error)
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Wipes the log in one step.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
