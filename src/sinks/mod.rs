//! # Failure sinks for listener invocation failures.
//!
//! A listener that panics or returns an error never disturbs `emit`: the failure is
//! wrapped in a [`ListenerFailure`] and handed to the registry's [`FailureSink`].
//!
//! ## Architecture
//! ```text
//! emit(name, msg)
//!   ├──► listener 1 ── ok
//!   ├──► listener 2 ── panic / Err ──► ListenerFailure ──► FailureSink::on_failure()
//!   │                                                          │
//!   │                                     ┌────────────┬───────┴──────┐
//!   │                                     ▼            ▼              ▼
//!   │                                  LogSink      SinkFn      DeferredSink
//!   │                              (tracing::error) (closure)   (later tokio tick)
//!   └──► listener 3 ── ok              (delivery continues)
//! ```
//!
//! ## Implementing custom sinks
//! ```rust
//! use event_registry::{FailureSink, ListenerFailure};
//!
//! struct Counter(std::sync::atomic::AtomicUsize);
//!
//! impl FailureSink for Counter {
//!     fn on_failure(&self, _failure: ListenerFailure) {
//!         self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
//!     }
//!     fn name(&self) -> &'static str { "counter" }
//! }
//! ```

#[cfg(feature = "deferred")]
mod deferred;
mod failure;
mod log;
mod sink;

#[cfg(feature = "deferred")]
pub use deferred::DeferredSink;
pub use failure::ListenerFailure;
pub use log::LogSink;
pub use sink::{FailureSink, SinkFn};
