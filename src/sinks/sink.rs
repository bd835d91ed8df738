//! # Core failure sink trait
//!
//! `FailureSink` is the extension point that decides what happens to a listener
//! failure: log it, count it, forward it to another thread, crash the process.
//!
//! ## Contract
//! - Called synchronously from `emit`, right after the failing listener returned
//!   and before the next listener runs.
//! - Must not block for long; hand heavy work off (see `DeferredSink`).
//! - Must not panic: a panicking sink unwinds out of `emit`.
//! - May call back into the registry; no registry lock is held.

use std::fmt;
use std::sync::Arc;

use crate::sinks::ListenerFailure;

/// Receiver of listener invocation failures.
pub trait FailureSink: Send + Sync + 'static {
    /// Handle a single failure. Ownership of the record is transferred.
    fn on_failure(&self, failure: ListenerFailure);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Closure-backed failure sink.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use event_registry::{
///     EventRegistry, FailureSink, Listener, ListenerFailure, RegistryConfig, SinkFn,
/// };
///
/// let sink: Arc<dyn FailureSink> = SinkFn::arc("stderr", |f: ListenerFailure| eprintln!("{f}"));
/// let registry: EventRegistry<()> = EventRegistry::builder(RegistryConfig::default())
///     .with_sink(sink)
///     .build();
/// registry.on("tick", Listener::new(|_: &()| panic!("boom")))?;
/// registry.emit("tick", &());
/// # Ok::<(), event_registry::RegistryError>(())
/// ```
pub struct SinkFn<F> {
    name: &'static str,
    f: F,
}

impl<F> SinkFn<F>
where
    F: Fn(ListenerFailure) + Send + Sync + 'static,
{
    /// Creates a new closure-backed sink.
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }

    /// Creates the sink and returns it as a shared handle.
    pub fn arc(name: &'static str, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> FailureSink for SinkFn<F>
where
    F: Fn(ListenerFailure) + Send + Sync + 'static,
{
    fn on_failure(&self, failure: ListenerFailure) {
        (self.f)(failure)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

impl<F> fmt::Debug for SinkFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkFn").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ListenerError;
    use crate::listeners::ListenerKind;
    use std::sync::Mutex;

    #[test]
    fn test_sink_fn_forwards_and_names() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let sink = SinkFn::new("vec", move |f: ListenerFailure| {
            s.lock().unwrap().push(f.to_string());
        });
        assert_eq!(sink.name(), "vec");

        sink.on_failure(ListenerFailure {
            event: "saved".into(),
            listener: "indexer".into(),
            kind: ListenerKind::Once,
            error: ListenerError::Failed {
                source: "index locked".into(),
            },
        });

        assert_eq!(
            *seen.lock().unwrap(),
            ["event 'saved' listener 'indexer' (once): listener failed: index locked"]
        );
    }
}
