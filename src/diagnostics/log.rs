//! # TracingSink — default diagnostic sink
//!
//! Writes dispatcher diagnostics through `tracing`:
//!
//! ```text
//! WARN  handler fault raised  dispatcher=main handler=writer fault=handler_failed
//!       description=eventvisor::events::error_event::ErrorEvent#12;source=main;event=...
//! ERROR handler fault dropped dispatcher=main handler=audit fault=handler_panicked
//!       event=eventvisor::events::error_event::ErrorEvent#12 error=panicked: boom
//! ```

use crate::core::EventDispatcher;
use crate::diagnostics::DiagnosticSink;
use crate::error::HandlerFault;
use crate::events::{ErrorEvent, Event};

/// Sink that logs through `tracing`.
#[derive(Default, Debug, Clone, Copy)]
pub struct TracingSink;

impl TracingSink {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticSink for TracingSink {
    fn error_raised(&self, dispatcher: &EventDispatcher, error: &ErrorEvent) {
        tracing::warn!(
            dispatcher = %dispatcher.name(),
            handler = error.failed_handler().unwrap_or("unknown"),
            fault = error.fault().map_or("none", HandlerFault::as_label),
            description = error.description(),
            "handler fault raised"
        );
    }

    fn fault_dropped(
        &self,
        dispatcher: &EventDispatcher,
        event: &dyn Event,
        handler: &str,
        fault: &HandlerFault,
    ) {
        tracing::error!(
            dispatcher = %dispatcher.name(),
            handler,
            fault = fault.as_label(),
            event = %event.identity(),
            error = %fault,
            "handler fault dropped"
        );
    }

    fn name(&self) -> &'static str {
        "tracing"
    }
}
