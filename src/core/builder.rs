use std::sync::Arc;

use super::{config::DispatcherConfig, dispatcher::EventDispatcher};
use crate::diagnostics::{DiagnosticSink, TracingSink};

/// Builder for constructing an [`EventDispatcher`] with optional features.
pub struct DispatcherBuilder {
    cfg: DispatcherConfig,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl DispatcherBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: DispatcherConfig) -> Self {
        Self { cfg, sink: None }
    }

    /// Sets the sink that receives diagnostics for recovered handler faults.
    ///
    /// Defaults to [`TracingSink`].
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Builds the dispatcher.
    ///
    /// Returned as `Arc` so it can be shared with handlers and
    /// [`ForwardingHandler`](crate::ForwardingHandler)s.
    pub fn build(self) -> Arc<EventDispatcher> {
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(TracingSink::new()) as Arc<dyn DiagnosticSink>);
        tracing::debug!(
            dispatcher = %self.cfg.name,
            sink = sink.name(),
            catch_panics = self.cfg.catch_panics,
            redispatch_faults = self.cfg.redispatch_faults,
            "dispatcher built"
        );
        Arc::new(EventDispatcher::new_internal(self.cfg, sink))
    }
}
