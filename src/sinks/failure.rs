//! Record describing one failed listener invocation.

use std::fmt;

use crate::error::ListenerError;
use crate::listeners::ListenerKind;

/// One listener invocation that panicked or returned an error during `emit`.
///
/// Each failure produces exactly one record.
#[derive(Debug)]
pub struct ListenerFailure {
    /// Event name that was being emitted.
    pub event: String,
    /// Name of the failing listener.
    pub listener: String,
    /// Batch the listener ran in.
    pub kind: ListenerKind,
    /// What went wrong.
    pub error: ListenerError,
}

impl fmt::Display for ListenerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "event '{}' listener '{}' ({}): {}",
            self.event, self.listener, self.kind, self.error
        )
    }
}

impl std::error::Error for ListenerFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
