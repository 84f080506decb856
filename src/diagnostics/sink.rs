//! # Diagnostic sink trait.
//!
//! A [`DiagnosticSink`] is told about faults the dispatcher recovers from.
//! It is the only place faults surface outside of error-event handlers,
//! and the only place a dropped second-level fault is reported at all.
//!
//! ## Calls
//! - [`DiagnosticSink::error_raised`]: an [`ErrorEvent`] was built for a fault,
//!   right before it is dispatched.
//! - [`DiagnosticSink::fault_dropped`]: a fault was discarded without being
//!   dispatched (raised while an `ErrorEvent` was being handled, or
//!   redispatch is disabled).
//!
//! Sinks run synchronously on the dispatching thread and should not panic.

use crate::core::EventDispatcher;
use crate::error::HandlerFault;
use crate::events::{ErrorEvent, Event};

/// Receiver of dispatcher diagnostics.
pub trait DiagnosticSink: Send + Sync + 'static {
    /// An error event was created for a handler fault.
    fn error_raised(&self, dispatcher: &EventDispatcher, error: &ErrorEvent) {
        let _ = (dispatcher, error);
    }

    /// A fault was dropped without redispatch.
    ///
    /// `event` is the event whose handler failed, `handler` the handler's name.
    fn fault_dropped(
        &self,
        dispatcher: &EventDispatcher,
        event: &dyn Event,
        handler: &str,
        fault: &HandlerFault,
    ) {
        let _ = (dispatcher, event, handler, fault);
    }

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
