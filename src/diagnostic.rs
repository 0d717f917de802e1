//! Diagnostic log
//!
//! Append-only, timestamped record of what the server (or client) did.
//! Purely a side-channel: nothing reads it back, and a failure to record
//! an event never affects bidding. Each event is written as exactly one
//! line, and concurrent writers never interleave inside a line.
mod file;
mod in_memory;

pub use self::{file::*, in_memory::*};

use crate::event::Event;
use anyhow::Result;
use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::warn;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub trait DiagnosticSink {
    /// Append one timestamped line
    fn record(&self, event: &str) -> Result<()>;

    /// Record an event, reporting failures to `tracing` only
    fn event(&self, event: &Event) {
        if let Err(e) = self.record(&event.to_string()) {
            warn!(error = %e, "failed to record diagnostic event");
        }
    }
}

pub type SharedSink = Arc<dyn DiagnosticSink + Send + Sync + 'static>;

/// Render a log line, newline-terminated
///
/// Line breaks inside `event` are escaped so an event never spans lines.
pub fn format_line(at: DateTime<Local>, event: &str) -> String {
    format!(
        "[{}] {}\n",
        at.format(TIMESTAMP_FORMAT),
        event.trim_end().replace('\n', "\\n")
    )
}
