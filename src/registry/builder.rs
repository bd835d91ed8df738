use std::marker::PhantomData;
use std::sync::Arc;

use crate::registry::{EventRegistry, RegistryConfig};
use crate::sinks::{FailureSink, LogSink};

/// Builder for constructing an [`EventRegistry`] with a custom failure sink.
pub struct RegistryBuilder<M: 'static> {
    cfg: RegistryConfig,
    sink: Option<Arc<dyn FailureSink>>,
    _msg: PhantomData<fn(&M)>,
}

impl<M: 'static> RegistryBuilder<M> {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: RegistryConfig) -> Self {
        Self {
            cfg,
            sink: None,
            _msg: PhantomData,
        }
    }

    /// Sets the sink that receives listener invocation failures.
    ///
    /// Defaults to [`LogSink`] when not set.
    pub fn with_sink(mut self, sink: Arc<dyn FailureSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Builds the registry. The result starts empty.
    pub fn build(self) -> EventRegistry<M> {
        let sink = self.sink.unwrap_or_else(|| Arc::new(LogSink::new()));
        EventRegistry::new_internal(self.cfg, sink)
    }
}
