//! Classification of a listener registration.

use std::fmt;

/// Which list of the registry a listener was registered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Registered via `on`; invoked on every matching `emit` until removed.
    Persistent,
    /// Registered via `once`; detached and invoked on the next matching `emit` only.
    Once,
}

impl ListenerKind {
    /// Returns a short stable label for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListenerKind::Persistent => "persistent",
            ListenerKind::Once => "once",
        }
    }
}

impl fmt::Display for ListenerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
