//! Registry core: listener bookkeeping and emission.
//!
//! The only public entry point is [`EventRegistry`]; it is configured through
//! [`RegistryConfig`] and assembled by [`RegistryBuilder`].
//!
//! Internal modules:
//! - `core`: the two listener maps and all public operations;
//! - `invoke`: runs one listener with panic/error isolation;
//! - `config`: behavior toggles;
//! - `builder`: wiring of config and failure sink;
//! - `report`: per-emit delivery counters.

mod builder;
mod config;
mod core;
mod invoke;
mod report;

pub use builder::RegistryBuilder;
pub use config::RegistryConfig;
pub use self::core::{EventRegistry, WeakRegistry};
pub use report::EmitReport;
