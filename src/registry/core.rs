//! # EventRegistry - named, synchronous publish/subscribe.
//!
//! The registry keeps two maps keyed by event name:
//! - `persistent`: listeners registered with [`EventRegistry::on`];
//! - `once`: listeners registered with [`EventRegistry::once`].
//!
//! ## Emit algorithm
//! ```text
//! emit(name, msg)
//!   1. batch    = once.remove(name)           (detached before anything runs)
//!      for l in batch     → invoke(l, msg)    (once() inside → next emit)
//!   2. snapshot = persistent[name].clone()    (looked up after step 1)
//!      for l in snapshot  → invoke(l, msg)    (on()/off() inside → next emit)
//!   3. failures → FailureSink, one record each, delivery continues
//! ```
//!
//! ## Rules
//! - The state lock is **never** held while a listener runs, so listeners may call
//!   any registry method (including `emit`) on the same registry.
//! - A key exists only while its list is non-empty.
//! - Listeners removed from the maps are dropped after the lock is released;
//!   a listener's `Drop` may reenter the registry.
//! - Duplicates are allowed: each registration is one invocation per emit.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::{debug, trace};

use crate::error::RegistryError;
use crate::listeners::{Listener, ListenerKind};
use crate::registry::invoke::{Outcome, invoke};
use crate::registry::{EmitReport, RegistryBuilder, RegistryConfig};
use crate::sinks::{FailureSink, ListenerFailure, LogSink};

type ListenerMap<M> = HashMap<String, Vec<Listener<M>>>;

struct State<M: 'static> {
    persistent: ListenerMap<M>,
    once: ListenerMap<M>,
}

impl<M: 'static> State<M> {
    fn map(&self, kind: ListenerKind) -> &ListenerMap<M> {
        match kind {
            ListenerKind::Persistent => &self.persistent,
            ListenerKind::Once => &self.once,
        }
    }

    fn map_mut(&mut self, kind: ListenerKind) -> &mut ListenerMap<M> {
        match kind {
            ListenerKind::Persistent => &mut self.persistent,
            ListenerKind::Once => &mut self.once,
        }
    }
}

struct Shared<M: 'static> {
    state: Mutex<State<M>>,
    sink: Arc<dyn FailureSink>,
    cfg: RegistryConfig,
}

/// In-process registry of named listeners.
///
/// Cloning is cheap and yields another handle to the **same** registry, which is
/// how listeners reach back into it during `emit`.
///
/// ## Example
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use event_registry::{EventRegistry, Listener};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let registry: EventRegistry<u32> = EventRegistry::new();
///
/// let s = Arc::clone(&seen);
/// let a = Listener::new(move |n: &u32| s.lock().unwrap().push(format!("A({n})")));
/// let s = Arc::clone(&seen);
/// let b = Listener::new(move |n: &u32| s.lock().unwrap().push(format!("B({n})")));
///
/// registry.on("x", a)?.once("x", b)?;
/// registry.emit("x", &1);
/// registry.emit("x", &2);
///
/// assert_eq!(*seen.lock().unwrap(), ["B(1)", "A(1)", "A(2)"]);
/// # Ok::<(), event_registry::RegistryError>(())
/// ```
pub struct EventRegistry<M: 'static> {
    shared: Arc<Shared<M>>,
}

impl<M: 'static> EventRegistry<M> {
    /// Creates an empty registry with default configuration and a [`LogSink`].
    pub fn new() -> Self {
        Self::new_internal(RegistryConfig::default(), Arc::new(LogSink::new()))
    }

    /// Returns a builder for a registry with custom configuration and sink.
    pub fn builder(cfg: RegistryConfig) -> RegistryBuilder<M> {
        RegistryBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: RegistryConfig, sink: Arc<dyn FailureSink>) -> Self {
        let state = State {
            persistent: HashMap::with_capacity(cfg.initial_capacity),
            once: HashMap::with_capacity(cfg.initial_capacity),
        };
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                sink,
                cfg,
            }),
        }
    }

    /// Returns the configuration this registry was built with.
    pub fn config(&self) -> &RegistryConfig {
        &self.shared.cfg
    }

    /// Returns a non-owning handle to this registry.
    ///
    /// Listeners that call back into the registry should capture a weak handle to
    /// avoid a reference cycle (registry → listener → registry).
    pub fn downgrade(&self) -> WeakRegistry<M> {
        WeakRegistry {
            shared: Arc::downgrade(&self.shared),
        }
    }

    // The lock only guards map mutations; no user code runs under it, so a
    // poisoned lock still holds consistent maps.
    fn state(&self) -> MutexGuard<'_, State<M>> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a persistent listener for `event`.
    ///
    /// Appends to the end of the event's list; registering the same listener twice
    /// makes it run twice per emit.
    ///
    /// # Errors
    /// [`RegistryError::InvalidListener`] if `listener` is not callable; nothing is registered.
    pub fn on(&self, event: &str, listener: Listener<M>) -> Result<&Self, RegistryError> {
        self.register(ListenerKind::Persistent, event, listener)
    }

    /// Registers a one-shot listener for `event`.
    ///
    /// The listener is detached by the next `emit(event, ..)` before it runs,
    /// whether or not it succeeds.
    ///
    /// # Errors
    /// [`RegistryError::InvalidListener`] if `listener` is not callable; nothing is registered.
    pub fn once(&self, event: &str, listener: Listener<M>) -> Result<&Self, RegistryError> {
        self.register(ListenerKind::Once, event, listener)
    }

    fn register(
        &self,
        kind: ListenerKind,
        event: &str,
        listener: Listener<M>,
    ) -> Result<&Self, RegistryError> {
        if !listener.is_callable() {
            return Err(RegistryError::InvalidListener {
                event: event.to_owned(),
                listener: listener.name().to_owned(),
            });
        }
        trace!(event, kind = %kind, listener = listener.name(), "register listener");

        let mut state = self.state();
        let map = state.map_mut(kind);
        match map.get_mut(event) {
            Some(list) => list.push(listener),
            None => {
                map.insert(event.to_owned(), vec![listener]);
            }
        }
        Ok(self)
    }

    /// Removes every persistent registration of `listener` for `event`.
    ///
    /// No-op if the listener is not registered.
    pub fn off(&self, event: &str, listener: &Listener<M>) -> &Self {
        self.unregister(ListenerKind::Persistent, event, listener)
    }

    /// Removes every one-shot registration of `listener` for `event`.
    ///
    /// No-op if the listener is not registered.
    pub fn remove_once(&self, event: &str, listener: &Listener<M>) -> &Self {
        self.unregister(ListenerKind::Once, event, listener)
    }

    fn unregister(&self, kind: ListenerKind, event: &str, listener: &Listener<M>) -> &Self {
        let removed = {
            let mut state = self.state();
            let map = state.map_mut(kind);
            let Some(list) = map.get_mut(event) else {
                return self;
            };
            let (removed, kept): (Vec<_>, Vec<_>) =
                list.drain(..).partition(|l| l.same_as(listener));
            if kept.is_empty() {
                map.remove(event);
            } else {
                *list = kept;
            }
            removed
        };
        if !removed.is_empty() {
            trace!(event, kind = %kind, removed = removed.len(), "unregister listener");
        }
        self
    }

    /// Removes all persistent listeners for `event`. No-op if there are none.
    pub fn remove_all_normal_listeners(&self, event: &str) {
        self.remove_all(ListenerKind::Persistent, event);
    }

    /// Removes all one-shot listeners for `event`. No-op if there are none.
    pub fn remove_all_once_listeners(&self, event: &str) {
        self.remove_all(ListenerKind::Once, event);
    }

    fn remove_all(&self, kind: ListenerKind, event: &str) {
        let removed = self.state().map_mut(kind).remove(event);
        if let Some(list) = removed {
            trace!(event, kind = %kind, removed = list.len(), "remove all listeners");
        }
    }

    /// Removes every listener of every event.
    pub fn clear(&self) {
        let (persistent, once) = {
            let mut state = self.state();
            (
                std::mem::take(&mut state.persistent),
                std::mem::take(&mut state.once),
            )
        };
        trace!(
            persistent = persistent.len(),
            once = once.len(),
            "clear registry"
        );
    }

    /// Publishes `message` to all listeners of `event`.
    ///
    /// One-shot listeners run first, then a snapshot of the persistent listeners,
    /// each group in registration order. A listener failure is reported to the
    /// failure sink and never stops delivery nor reaches the caller.
    ///
    /// Emitting an event without listeners is a no-op.
    pub fn emit(&self, event: &str, message: &M) -> EmitReport {
        let mut report = EmitReport::default();

        let batch = self.state().once.remove(event);
        if let Some(batch) = batch {
            for listener in &batch {
                self.dispatch(ListenerKind::Once, event, listener, message, &mut report);
            }
        }

        // Expired one-shot listeners are already gone; only persistent ones need pruning.
        let expired_once = report.expired;
        let snapshot = self.state().persistent.get(event).cloned();
        if let Some(snapshot) = snapshot {
            for listener in &snapshot {
                self.dispatch(ListenerKind::Persistent, event, listener, message, &mut report);
            }
        }

        if report.expired > expired_once && self.shared.cfg.prune_expired {
            self.prune_expired(event);
        }
        trace!(
            event,
            delivered = report.delivered,
            failed = report.failed,
            expired = report.expired,
            "emit"
        );
        report
    }

    fn dispatch(
        &self,
        kind: ListenerKind,
        event: &str,
        listener: &Listener<M>,
        message: &M,
        report: &mut EmitReport,
    ) {
        match invoke(listener, message, self.shared.cfg.catch_panics) {
            Outcome::Delivered => report.delivered += 1,
            Outcome::Expired => report.expired += 1,
            Outcome::Failed(error) => {
                report.failed += 1;
                self.shared.sink.on_failure(ListenerFailure {
                    event: event.to_owned(),
                    listener: listener.name().to_owned(),
                    kind,
                    error,
                });
            }
        }
    }

    fn prune_expired(&self, event: &str) {
        let pruned = {
            let mut state = self.state();
            let map = &mut state.persistent;
            let Some(list) = map.get_mut(event) else {
                return;
            };
            let (pruned, kept): (Vec<_>, Vec<_>) = list.drain(..).partition(|l| !l.is_callable());
            if kept.is_empty() {
                map.remove(event);
            } else {
                *list = kept;
            }
            pruned
        };
        if !pruned.is_empty() {
            debug!(event, pruned = pruned.len(), "pruned expired weak listeners");
        }
    }

    /// True if `event` has at least one persistent or one-shot listener.
    pub fn has_listeners(&self, event: &str) -> bool {
        let state = self.state();
        state.persistent.contains_key(event) || state.once.contains_key(event)
    }

    /// Number of registrations (persistent + one-shot) for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        let state = self.state();
        let persistent = state.persistent.get(event).map_or(0, Vec::len);
        persistent + state.once.get(event).map_or(0, Vec::len)
    }

    /// Number of registrations of the given kind for `event`.
    pub fn listener_count_of(&self, event: &str, kind: ListenerKind) -> usize {
        self.state().map(kind).get(event).map_or(0, Vec::len)
    }

    /// Sorted names of all events with at least one listener.
    pub fn event_names(&self) -> Vec<String> {
        let state = self.state();
        let names: BTreeSet<&String> = state.persistent.keys().chain(state.once.keys()).collect();
        names.into_iter().cloned().collect()
    }
}

impl<M: 'static> Clone for EventRegistry<M> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<M: 'static> Default for EventRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: 'static> fmt::Debug for EventRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("EventRegistry")
            .field("persistent_events", &state.persistent.len())
            .field("once_events", &state.once.len())
            .field("sink", &self.shared.sink.name())
            .field("config", &self.shared.cfg)
            .finish()
    }
}

/// Non-owning handle to an [`EventRegistry`], obtained via [`EventRegistry::downgrade`].
pub struct WeakRegistry<M: 'static> {
    shared: Weak<Shared<M>>,
}

impl<M: 'static> WeakRegistry<M> {
    /// Returns the registry if it is still alive.
    pub fn upgrade(&self) -> Option<EventRegistry<M>> {
        self.shared.upgrade().map(|shared| EventRegistry { shared })
    }
}

impl<M: 'static> Clone for WeakRegistry<M> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<M: 'static> fmt::Debug for WeakRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakRegistry")
            .field("alive", &(self.shared.strong_count() > 0))
            .finish()
    }
}
