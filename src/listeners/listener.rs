//! # Function-backed listener handle (`Listener`)
//!
//! [`Listener`] wraps a callable `Fn(&M)` behind a shared pointer. The pointer's
//! address is the listener's identity: clones of one handle are the *same*
//! listener, two handles built from two closures are *different* listeners even
//! if the closures are textually identical.
//!
//! ## Targets
//! - **Owned** ([`Listener::new`], [`Listener::fallible`]): the handle keeps the
//!   callable alive; it is always callable.
//! - **Weak** ([`Listener::downgrade`]): the handle references a callable owned
//!   elsewhere and does not keep it alive. Once the owner drops it, the listener
//!   is no longer callable: registering it fails and emits skip it.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use event_registry::Listener;
//!
//! let a = Listener::new(|msg: &String| println!("{msg}")).named("printer");
//! let b = a.clone();
//! assert_eq!(a, b);
//! assert_eq!(a.name(), "printer");
//!
//! let owned = Arc::new(|_: &String| {});
//! let weak = Listener::downgrade(&owned);
//! assert!(weak.is_callable());
//! assert_eq!(weak, Listener::downgrade(&owned));
//! drop(owned);
//! assert!(!weak.is_callable());
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, Weak};

use crate::error::BoxError;

type Callback<M> = dyn Fn(&M) -> Result<(), BoxError> + Send + Sync;
type Plain<M> = dyn Fn(&M) + Send + Sync;

enum Target<M: 'static> {
    Owned(Arc<Callback<M>>),
    Weak(Weak<Plain<M>>),
}

/// Clonable, identity-compared handle to a listener callable.
pub struct Listener<M: 'static> {
    target: Target<M>,
    name: Cow<'static, str>,
}

impl<M: 'static> Listener<M> {
    /// Creates an owned listener from an infallible callable.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&M) + Send + Sync + 'static,
    {
        let cb: Arc<Callback<M>> = Arc::new(move |msg: &M| {
            f(msg);
            Ok(())
        });
        Self::from_target(Target::Owned(cb))
    }

    /// Creates an owned listener from a callable that may fail.
    ///
    /// An `Err` returned by `f` is reported to the registry's failure sink; it never
    /// interrupts delivery to other listeners.
    ///
    /// ## Example
    /// ```rust
    /// use event_registry::Listener;
    ///
    /// let l = Listener::fallible(|n: &u32| {
    ///     if *n == 0 {
    ///         return Err("zero is not allowed");
    ///     }
    ///     Ok(())
    /// });
    /// assert!(l.is_callable());
    /// ```
    pub fn fallible<F, E>(f: F) -> Self
    where
        F: Fn(&M) -> Result<(), E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let cb: Arc<Callback<M>> = Arc::new(move |msg: &M| f(msg).map_err(Into::into));
        Self::from_target(Target::Owned(cb))
    }

    /// Creates a non-owning listener referencing a callable owned elsewhere.
    ///
    /// Handles downgraded from the same `Arc` are the same listener.
    pub fn downgrade<F>(target: &Arc<F>) -> Self
    where
        F: Fn(&M) + Send + Sync + 'static,
    {
        let weak: Weak<F> = Arc::downgrade(target);
        let weak: Weak<Plain<M>> = weak;
        Self::from_target(Target::Weak(weak))
    }

    fn from_target(target: Target<M>) -> Self {
        Self {
            target,
            name: Cow::Borrowed("anonymous"),
        }
    }

    /// Sets a human-readable name used in failure reports and logs.
    ///
    /// The name does not take part in identity.
    #[must_use]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the listener name (`"anonymous"` unless set via [`Listener::named`]).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if invoking this listener would run a live callable.
    ///
    /// Owned listeners are always callable; weak listeners are callable while
    /// their target is alive.
    pub fn is_callable(&self) -> bool {
        match &self.target {
            Target::Owned(_) => true,
            Target::Weak(w) => w.strong_count() > 0,
        }
    }

    /// True if the handle does not keep its callable alive.
    pub fn is_weak(&self) -> bool {
        matches!(self.target, Target::Weak(_))
    }

    /// Returns `true` if both handles refer to the same callable.
    pub fn same_as(&self, other: &Self) -> bool {
        std::ptr::eq(self.addr(), other.addr())
    }

    /// Invokes the callable.
    ///
    /// Returns `None` when the target of a weak listener is gone.
    pub(crate) fn call(&self, msg: &M) -> Option<Result<(), BoxError>> {
        match &self.target {
            Target::Owned(cb) => Some(cb(msg)),
            Target::Weak(w) => w.upgrade().map(|cb| {
                cb(msg);
                Ok(())
            }),
        }
    }

    // A weak handle keeps the allocation (not the value) alive, so the address
    // stays unique for as long as any handle exists.
    fn addr(&self) -> *const () {
        match &self.target {
            Target::Owned(cb) => Arc::as_ptr(cb) as *const (),
            Target::Weak(w) => w.as_ptr() as *const (),
        }
    }
}

impl<M: 'static> Clone for Listener<M> {
    fn clone(&self) -> Self {
        let target = match &self.target {
            Target::Owned(cb) => Target::Owned(Arc::clone(cb)),
            Target::Weak(w) => Target::Weak(Weak::clone(w)),
        };
        Self {
            target,
            name: self.name.clone(),
        }
    }
}

impl<M: 'static> PartialEq for Listener<M> {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl<M: 'static> Eq for Listener<M> {}

impl<M: 'static> fmt::Debug for Listener<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("name", &self.name)
            .field("weak", &self.is_weak())
            .field("callable", &self.is_callable())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_clones_share_identity() {
        let a = Listener::new(|_: &u8| {});
        let b = a.clone().named("renamed");
        assert_eq!(a, b);
        assert_eq!(b.name(), "renamed");
        assert_eq!(a.name(), "anonymous");
    }

    #[test]
    fn test_distinct_closures_are_distinct_listeners() {
        let a = Listener::new(|_: &u8| {});
        let b = Listener::new(|_: &u8| {});
        assert_ne!(a, b);
    }

    #[test]
    fn test_fallible_reports_error() {
        let l = Listener::fallible(|n: &i32| if *n < 0 { Err("negative") } else { Ok(()) });
        assert!(matches!(l.call(&1), Some(Ok(()))));
        let err = l.call(&-1).and_then(Result::err).map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("negative"));
    }

    #[test]
    fn test_weak_listener_lifecycle() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let target = Arc::new(move |_: &u8| {
            h.fetch_add(1, Ordering::SeqCst);
        });

        let weak = Listener::downgrade(&target);
        assert!(weak.is_weak());
        assert!(weak.is_callable());
        assert_eq!(weak, Listener::downgrade(&target));

        assert!(weak.call(&0).is_some());
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        drop(target);
        assert!(!weak.is_callable());
        assert!(weak.call(&0).is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
