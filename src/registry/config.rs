//! # Registry configuration.
//!
//! Provides [`RegistryConfig`], the behavior toggles consumed by
//! [`RegistryBuilder`](crate::RegistryBuilder).

/// Configuration for an [`EventRegistry`](crate::EventRegistry).
///
/// ## Field semantics
/// - `catch_panics`: isolate panicking listeners (`false` = panics unwind out of `emit`)
/// - `prune_expired`: drop weak listeners whose target is gone when `emit` meets them
/// - `initial_capacity`: pre-sized number of event names in each listener map
#[derive(Clone, Debug)]
pub struct RegistryConfig {
    /// Run every listener inside `catch_unwind` and report panics to the failure sink.
    ///
    /// When disabled, a panicking listener aborts the running emit and the panic
    /// reaches the caller. One-shot listeners of that emit are still consumed.
    pub catch_panics: bool,

    /// Remove expired weak listeners from the persistent lists during `emit`.
    ///
    /// Expired listeners are skipped either way; this only controls cleanup.
    pub prune_expired: bool,

    /// Initial capacity of the persistent and one-shot maps (`0` = grow on demand).
    pub initial_capacity: usize,
}

impl Default for RegistryConfig {
    /// Default configuration:
    ///
    /// - `catch_panics = true`
    /// - `prune_expired = true`
    /// - `initial_capacity = 0`
    fn default() -> Self {
        Self {
            catch_panics: true,
            prune_expired: true,
            initial_capacity: 0,
        }
    }
}
