//! Error types used by the event registry and its listeners.
//!
//! This module defines two error enums:
//!
//! - [`RegistryError`] — errors raised synchronously by registry operations.
//! - [`ListenerError`] — the cause of a failed listener invocation during `emit`.
//!
//! A [`ListenerError`] never reaches the caller of `emit`; it is wrapped into a
//! [`ListenerFailure`](crate::ListenerFailure) and handed to the registry's
//! [`FailureSink`](crate::FailureSink).
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.

use thiserror::Error;

/// Boxed error returned by fallible listeners.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # Errors produced by registry operations.
///
/// Only registration can fail; removal and emission treat absence as a no-op.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The listener handle does not point at a live callable
    /// (a weak listener whose target was already dropped).
    #[error("listener '{listener}' for event '{event}' is not callable")]
    InvalidListener {
        /// Event name the registration was attempted for.
        event: String,
        /// Name of the rejected listener.
        listener: String,
    },
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use event_registry::RegistryError;
    ///
    /// let err = RegistryError::InvalidListener { event: "x".into(), listener: "l".into() };
    /// assert_eq!(err.as_label(), "registry_invalid_listener");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::InvalidListener { .. } => "registry_invalid_listener",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RegistryError::InvalidListener { event, listener } => {
                format!("invalid listener: event={event} listener={listener}")
            }
        }
    }
}

/// # Errors raised by a listener while it was being invoked.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ListenerError {
    /// The listener panicked; the payload is rendered to a string.
    #[error("listener panicked: {message}")]
    Panicked {
        /// Panic payload (`&str` / `String` payloads verbatim, otherwise a placeholder).
        message: String,
    },

    /// A fallible listener returned an error.
    #[error("listener failed: {source}")]
    Failed {
        /// The error returned by the listener.
        #[source]
        source: BoxError,
    },
}

impl ListenerError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use event_registry::ListenerError;
    ///
    /// let err = ListenerError::Panicked { message: "boom".into() };
    /// assert_eq!(err.as_label(), "listener_panicked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerError::Panicked { .. } => "listener_panicked",
            ListenerError::Failed { .. } => "listener_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ListenerError::Panicked { message } => format!("panic: {message}"),
            ListenerError::Failed { source } => format!("error: {source}"),
        }
    }

    /// Builds a [`ListenerError::Panicked`] from a `catch_unwind` payload.
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        ListenerError::Panicked { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_payload_rendering() {
        let err = ListenerError::from_panic(Box::new("static boom"));
        assert_eq!(err.as_message(), "panic: static boom");

        let err = ListenerError::from_panic(Box::new(String::from("owned boom")));
        assert_eq!(err.to_string(), "listener panicked: owned boom");

        let err = ListenerError::from_panic(Box::new(42_u8));
        assert_eq!(err.as_message(), "panic: non-string panic payload");
    }

    #[test]
    fn test_failed_keeps_source() {
        let err = ListenerError::Failed {
            source: "disk full".into(),
        };
        assert_eq!(err.as_label(), "listener_failed");
        assert_eq!(err.to_string(), "listener failed: disk full");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_invalid_listener_message() {
        let err = RegistryError::InvalidListener {
            event: "ready".into(),
            listener: "ui".into(),
        };
        assert_eq!(
            err.to_string(),
            "listener 'ui' for event 'ready' is not callable"
        );
        assert_eq!(err.as_message(), "invalid listener: event=ready listener=ui");
    }
}
