//! # DeferredSink: surface failures on a later scheduler tick
//!
//! [`DeferredSink`] takes failures off the emitting call stack: `on_failure` only
//! enqueues, and a dedicated tokio worker hands each record to an inner sink later.
//! The emitting caller never observes the failure.
//!
//! ## Diagram
//! ```text
//!  emit() ── on_failure(f) ──► [unbounded queue] ──► worker task ──► inner.on_failure(f)
//!                                                        ▲
//!                              shutdown() ── cancel ─────┘  (drain queue, then exit)
//! ```
//!
//! ## Rules
//! - Unbounded queue: a failure is never dropped for lack of space.
//! - FIFO: the inner sink sees failures in the order they occurred.
//! - Exactly once: after [`DeferredSink::shutdown`] (or if the worker is gone),
//!   `on_failure` forwards to the inner sink synchronously instead.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use event_registry::{DeferredSink, EventRegistry, Listener, LogSink, RegistryConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sink = DeferredSink::spawn(Arc::new(LogSink::new()));
//!     let registry: EventRegistry<u32> = EventRegistry::builder(RegistryConfig::default())
//!         .with_sink(sink.clone())
//!         .build();
//!
//!     registry.on("job", Listener::fallible(|_: &u32| Err("no worker available")))?;
//!     registry.emit("job", &7); // returns normally
//!
//!     sink.shutdown().await; // failure has been logged by now
//!     Ok(())
//! }
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::sinks::{FailureSink, ListenerFailure};

/// Failure sink that forwards failures to an inner sink from a tokio worker task.
pub struct DeferredSink {
    tx: mpsc::UnboundedSender<ListenerFailure>,
    inner: Arc<dyn FailureSink>,
    token: CancellationToken,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl DeferredSink {
    /// Spawns the worker on the current tokio runtime.
    ///
    /// # Panics
    /// Panics if called outside of a tokio runtime (same as [`tokio::spawn`]).
    #[must_use]
    pub fn spawn(inner: Arc<dyn FailureSink>) -> Arc<Self> {
        Self::spawn_on(&Handle::current(), inner)
    }

    /// Spawns the worker on the given runtime handle.
    ///
    /// Useful when the registry lives on a thread that is not driven by tokio.
    #[must_use]
    pub fn spawn_on(rt: &Handle, inner: Arc<dyn FailureSink>) -> Arc<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel::<ListenerFailure>();
        let token = CancellationToken::new();

        let sink = Arc::clone(&inner);
        let stop = token.clone();
        let handle = rt.spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    next = rx.recv() => match next {
                        Some(failure) => sink.on_failure(failure),
                        None => return,
                    },
                    _ = stop.cancelled() => break,
                }
            }
            // Closing first makes late `send`s fail, so they take the synchronous path.
            rx.close();
            while let Some(failure) = rx.recv().await {
                sink.on_failure(failure);
            }
        });

        Arc::new(Self {
            tx,
            inner,
            token,
            worker: Mutex::new(Some(handle)),
        })
    }

    /// Stops the worker after every already queued failure was delivered.
    ///
    /// Later failures are forwarded to the inner sink synchronously.
    /// Idempotent.
    pub async fn shutdown(&self) {
        self.token.cancel();
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(inner = self.inner.name(), error = %e, "deferred failure worker ended abnormally");
            }
        }
    }

    /// True once [`DeferredSink::shutdown`] was requested.
    pub fn is_shut_down(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl FailureSink for DeferredSink {
    fn on_failure(&self, failure: ListenerFailure) {
        if self.token.is_cancelled() {
            self.inner.on_failure(failure);
            return;
        }
        if let Err(mpsc::error::SendError(failure)) = self.tx.send(failure) {
            self.inner.on_failure(failure);
        }
    }

    fn name(&self) -> &'static str {
        "DeferredSink"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ListenerError;
    use crate::listeners::{Listener, ListenerKind};
    use crate::registry::{EventRegistry, RegistryConfig};
    use crate::sinks::SinkFn;

    fn recording() -> (Arc<Mutex<Vec<String>>>, Arc<dyn FailureSink>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let sink: Arc<dyn FailureSink> = SinkFn::arc("record", move |f: ListenerFailure| {
            s.lock().unwrap().push(f.listener);
        });
        (seen, sink)
    }

    fn failure(listener: &str) -> ListenerFailure {
        ListenerFailure {
            event: "x".into(),
            listener: listener.into(),
            kind: ListenerKind::Persistent,
            error: ListenerError::Panicked {
                message: "boom".into(),
            },
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_failures_surface_after_emit_returns() {
        let (seen, inner) = recording();
        let sink = DeferredSink::spawn(inner);
        let registry: EventRegistry<u32> = EventRegistry::builder(RegistryConfig::default())
            .with_sink(sink.clone())
            .build();

        registry
            .on("x", Listener::new(|_: &u32| panic!("first")).named("a"))
            .and_then(|r| r.on("x", Listener::fallible(|_: &u32| Err("second")).named("b")))
            .unwrap();

        let report = registry.emit("x", &1);
        assert_eq!(report.failed, 2);
        // the worker has not been polled yet on a current-thread runtime
        assert!(seen.lock().unwrap().is_empty());

        sink.shutdown().await;
        assert_eq!(*seen.lock().unwrap(), ["a", "b"]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_worker_delivers_without_shutdown() {
        let (seen, inner) = recording();
        let sink = DeferredSink::spawn(inner);

        sink.on_failure(failure("a"));
        for _ in 0..10 {
            if !seen.lock().unwrap().is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(*seen.lock().unwrap(), ["a"]);
        sink.shutdown().await;
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_after_shutdown_failures_are_forwarded_inline() {
        let (seen, inner) = recording();
        let sink = DeferredSink::spawn(inner);

        sink.on_failure(failure("queued"));
        sink.shutdown().await;
        assert!(sink.is_shut_down());

        sink.on_failure(failure("late"));
        assert_eq!(*seen.lock().unwrap(), ["queued", "late"]);

        // idempotent
        sink.shutdown().await;
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_spawn_on_external_runtime() {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .build()
            .unwrap();
        let (seen, inner) = recording();
        let sink = DeferredSink::spawn_on(rt.handle(), inner);

        sink.on_failure(failure("a"));
        sink.on_failure(failure("b"));
        rt.block_on(sink.shutdown());

        assert_eq!(*seen.lock().unwrap(), ["a", "b"]);
    }
}
