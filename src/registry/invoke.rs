//! # Run a single listener invocation.
//!
//! Executes one [`Listener`] with the emitted message and classifies the result.
//!
//! ## Outcomes
//! ```text
//! call() → Some(Ok(()))  → Delivered
//! call() → Some(Err(e))  → Failed(ListenerError::Failed)
//! call() → panic         → Failed(ListenerError::Panicked)   (catch_panics = true)
//! call() → None          → Expired (weak target dropped)
//! ```
//!
//! ## Rules
//! - Never returns an error to the caller; failures are data.
//! - With `catch_panics = false` a panic unwinds through this function.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a listener panics while holding a lock on state it shares with other listeners.

use std::panic::{self, AssertUnwindSafe};

use crate::error::ListenerError;
use crate::listeners::Listener;

/// Result of invoking one listener.
pub(crate) enum Outcome {
    Delivered,
    Expired,
    Failed(ListenerError),
}

/// Invokes `listener` with `msg`, isolating panics when `catch_panics` is set.
pub(crate) fn invoke<M: 'static>(listener: &Listener<M>, msg: &M, catch_panics: bool) -> Outcome {
    let result = if catch_panics {
        match panic::catch_unwind(AssertUnwindSafe(|| listener.call(msg))) {
            Ok(result) => result,
            Err(payload) => return Outcome::Failed(ListenerError::from_panic(payload)),
        }
    } else {
        listener.call(msg)
    };

    match result {
        None => Outcome::Expired,
        Some(Ok(())) => Outcome::Delivered,
        Some(Err(source)) => Outcome::Failed(ListenerError::Failed { source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_classifies_outcomes() {
        let ok = Listener::new(|_: &u8| {});
        assert!(matches!(invoke(&ok, &0, true), Outcome::Delivered));

        let err = Listener::fallible(|_: &u8| Err("nope"));
        assert!(matches!(
            invoke(&err, &0, true),
            Outcome::Failed(ListenerError::Failed { .. })
        ));

        let boom = Listener::new(|_: &u8| panic!("boom"));
        match invoke(&boom, &0, true) {
            Outcome::Failed(ListenerError::Panicked { message }) => assert_eq!(message, "boom"),
            _ => panic!("expected a caught panic"),
        }

        let target = Arc::new(|_: &u8| {});
        let weak = Listener::downgrade(&target);
        drop(target);
        assert!(matches!(invoke(&weak, &0, true), Outcome::Expired));
    }

    #[test]
    #[should_panic(expected = "uncaught")]
    fn test_panics_propagate_when_not_caught() {
        let boom = Listener::new(|_: &u8| panic!("uncaught"));
        let _ = invoke(&boom, &0, false);
    }
}
