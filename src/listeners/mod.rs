//! # Listener handles.
//!
//! This module provides the types that identify *what* gets invoked on `emit`:
//! - [`Listener`] - clonable handle around a callable, compared by identity
//! - [`ListenerKind`] - which list a registration lives in (persistent / once)
//!
//! ## Identity
//! ```text
//! let a = Listener::new(f);      ─┐
//! let b = a.clone();              ├─ same allocation → a == b, off(a) also removes b
//! let c = Listener::new(f);      ─┘  new allocation  → a != c
//! ```

mod kind;
mod listener;

pub use kind::ListenerKind;
pub use listener::Listener;
