//! # LogSink — default failure sink
//!
//! Logs every listener failure as a `tracing` error event. The registry never
//! installs a `tracing` subscriber; without one, failures are silently discarded.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! ERROR event_registry::sinks::log: listener invocation failed event="ready" listener="ui" kind=once label="listener_panicked" error=listener panicked: boom
//! ```

use tracing::error;

use crate::sinks::{FailureSink, ListenerFailure};

/// Failure sink writing to `tracing` at `ERROR` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl LogSink {
    /// Construct a new [`LogSink`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FailureSink for LogSink {
    fn on_failure(&self, f: ListenerFailure) {
        error!(
            event = %f.event,
            listener = %f.listener,
            kind = %f.kind,
            label = f.error.as_label(),
            error = %f.error,
            "listener invocation failed"
        );
    }

    fn name(&self) -> &'static str {
        "LogSink"
    }
}
