//! # Simple logging handler for debugging and demos.
//!
//! [`LogHandler`] logs every event it sees at `INFO` and never stops
//! propagation. Register it at a low priority to trace a chain.
//!
//! ## Output format (with `tracing_subscriber::fmt`)
//! ```text
//! INFO event dispatcher=main event=eventvisor::events::simple::SimpleEvent#3;source=<none>;note=hello;
//! ```
//!
//! ## Example
//! ```no_run
//! # use eventvisor::{EventDispatcher, LogHandler, SimpleEvent};
//! let dispatcher = EventDispatcher::new();
//! dispatcher.add_handler::<SimpleEvent>(i32::MIN, LogHandler::arc());
//! ```

use std::sync::Arc;

use crate::core::EventDispatcher;
use crate::events::EventRef;
use crate::handlers::EventHandler;

/// Logging handler.
///
/// Enabled via the `logging` feature. Not intended for production use:
/// write a handler with the fields you need instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHandler;

impl LogHandler {
    pub fn arc() -> Arc<Self> {
        Arc::new(Self)
    }
}

impl EventHandler for LogHandler {
    fn handle_event(
        &self,
        dispatcher: &EventDispatcher,
        event: &EventRef,
    ) -> anyhow::Result<bool> {
        tracing::info!(
            dispatcher = %dispatcher.name(),
            event = event.description(),
            "event"
        );
        Ok(false)
    }

    fn name(&self) -> &str {
        "log"
    }
}
