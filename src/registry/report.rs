//! Per-emit delivery counters.

/// Summary of a single `emit` call.
///
/// Informational only: failures are delivered to the failure sink, never
/// returned to the emitting caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitReport {
    /// Listeners that ran to completion.
    pub delivered: usize,
    /// Listeners that panicked or returned an error.
    pub failed: usize,
    /// Weak listeners skipped because their target was gone.
    pub expired: usize,
}

impl EmitReport {
    /// Number of listeners that were actually invoked (`delivered + failed`).
    pub fn invoked(&self) -> usize {
        self.delivered + self.failed
    }

    /// True if no listener was invoked.
    pub fn is_empty(&self) -> bool {
        self.invoked() == 0
    }
}
