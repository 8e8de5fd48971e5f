use crate::domain::envelope::{ProbeSlot, PublishedResult, ResultEnvelope};
use crate::domain::log::LogEntry;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::TryRecvError;

#[derive(Serialize)]
struct ReportLine<'a> {
    probe: ProbeSlot,
    #[serde(flatten)]
    envelope: &'a ResultEnvelope,
}

/// Writes probe results as JSON lines followed by the activity log.
pub struct ReportWriter<W: Write> {
    out: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_result(&mut self, slot: ProbeSlot, envelope: &ResultEnvelope) -> Result<()> {
        serde_json::to_writer(&mut self.out, &ReportLine { probe: slot, envelope })?;
        writeln!(self.out)?;
        Ok(())
    }

    /// Writes every result already published on `events`, in arrival order.
    pub fn write_published(&mut self, events: &mut Receiver<PublishedResult>) -> Result<usize> {
        let mut written = 0;
        loop {
            match events.try_recv() {
                Ok(published) => {
                    self.write_result(published.slot, &published.envelope)?;
                    written += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "result report fell behind the board");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return Ok(written),
            }
        }
    }

    pub fn write_log(&mut self, entries: &[LogEntry]) -> Result<()> {
        writeln!(self.out, "--- activity log ({} entries) ---", entries.len())?;
        for entry in entries {
            writeln!(self.out, "{entry}")?;
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
