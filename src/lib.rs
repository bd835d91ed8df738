//! # event-registry
//!
//! **event-registry** is a minimal, synchronous, in-process publish/subscribe
//! registry. Components exchange named messages without holding references to
//! each other: one side registers listeners for an event name, the other emits.
//!
//! ## Architecture
//! ```text
//!   on(name, L) ───────► persistent: name → [L, L', ...]   (every emit)
//!   once(name, L) ─────► once:       name → [L, ...]       (next emit only)
//!
//!   emit(name, msg)
//!     │
//!     ├─► 1. take once[name]        ──► L(msg) for each, in order
//!     ├─► 2. clone persistent[name] ──► L(msg) for each, in order
//!     │
//!     └─► panic / Err in a listener ──► ListenerFailure ──► FailureSink
//!                                        (delivery continues, caller unaffected)
//! ```
//!
//! ## Reentrancy
//! Listeners may call back into the registry (`on`, `once`, `off`, `emit`, ...)
//! while an emit is running. The one-shot batch is detached before it runs and the
//! persistent list is iterated from a snapshot, so such calls only affect
//! **future** emits.
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                              |
//! |-------------------|---------------------------------------------------------------|-------------------------------------------------|
//! | **Registry**      | Register, remove and emit named events.                       | [`EventRegistry`], [`WeakRegistry`]             |
//! | **Listeners**     | Identity-compared handles, owned or weak, infallible or not.  | [`Listener`], [`ListenerKind`]                  |
//! | **Failures**      | Per-listener isolation, pluggable reporting.                  | [`FailureSink`], [`LogSink`], [`SinkFn`]        |
//! | **Errors**        | Typed errors for registration and listener failures.          | [`RegistryError`], [`ListenerError`]            |
//! | **Configuration** | Panic isolation, weak listener pruning, map sizing.           | [`RegistryConfig`], [`RegistryBuilder`]         |
//!
//! ## Optional features
//! - `deferred` _(default)_: exports [`DeferredSink`], which reports failures from a
//!   tokio worker task instead of the emitting call stack.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use event_registry::{EventRegistry, Listener};
//!
//! let registry: EventRegistry<String> = EventRegistry::new();
//! let hits = Arc::new(AtomicUsize::new(0));
//!
//! let h = Arc::clone(&hits);
//! let counter = Listener::new(move |_: &String| {
//!     h.fetch_add(1, Ordering::SeqCst);
//! })
//! .named("counter");
//!
//! registry
//!     .on("saved", counter.clone())?
//!     .once("saved", Listener::new(|msg: &String| println!("first save: {msg}")))?;
//!
//! registry.emit("saved", &"a.txt".to_string());
//! registry.emit("saved", &"b.txt".to_string());
//! assert_eq!(hits.load(Ordering::SeqCst), 2);
//!
//! registry.off("saved", &counter);
//! assert!(!registry.has_listeners("saved"));
//! # Ok::<(), event_registry::RegistryError>(())
//! ```
mod error;
mod listeners;
mod registry;
mod sinks;

// ---- Public re-exports ----

pub use error::{BoxError, ListenerError, RegistryError};
pub use listeners::{Listener, ListenerKind};
pub use registry::{EmitReport, EventRegistry, RegistryBuilder, RegistryConfig, WeakRegistry};
pub use sinks::{FailureSink, ListenerFailure, LogSink, SinkFn};

// Optional: failure sink backed by a tokio worker.
// Enabled by default; disable with `default-features = false`.
#[cfg(feature = "deferred")]
pub use sinks::DeferredSink;
