//! # Forwarding handler: bridges one dispatcher into another.
//!
//! [`ForwardingHandler`] re-dispatches every event it sees on a destination
//! dispatcher, unless the event is already being dispatched there.
//!
//! ```text
//! source.dispatch_event(ev)
//!     └─► ForwardingHandler ──► destination.dispatch_event(ev)
//!             returns false (the source chain keeps going)
//! ```
//!
//! The destination is held weakly: a forwarder registered on a dispatcher
//! that it also points to does not keep that dispatcher alive.
//!
//! ## Example
//! ```rust
//! use eventvisor::{EventDispatcher, ForwardingHandler, SimpleEvent};
//!
//! let front = EventDispatcher::new();
//! let back = EventDispatcher::new();
//! back.add_fn::<SimpleEvent, _>(0, "sink", |_d, _e| Ok(true));
//!
//! front.add_handler::<SimpleEvent>(0, ForwardingHandler::arc(&back));
//! assert!(!front.dispatch_event(&SimpleEvent::arc(None)));
//! ```

use std::sync::{Arc, Weak};

use crate::core::EventDispatcher;
use crate::error::EventError;
use crate::events::EventRef;
use crate::handlers::EventHandler;

/// Handler that forwards events to another dispatcher.
#[derive(Debug, Clone)]
pub struct ForwardingHandler {
    destination: Weak<EventDispatcher>,
}

impl ForwardingHandler {
    pub fn new(destination: &Arc<EventDispatcher>) -> Self {
        Self {
            destination: Arc::downgrade(destination),
        }
    }

    pub fn arc(destination: &Arc<EventDispatcher>) -> Arc<Self> {
        Arc::new(Self::new(destination))
    }

    /// Creates a forwarder from a weak handle.
    ///
    /// Fails with [`EventError::InvalidArgument`] if the destination is already gone.
    pub fn from_weak(destination: Weak<EventDispatcher>) -> Result<Self, EventError> {
        if destination.strong_count() == 0 {
            return Err(EventError::invalid_argument(
                "forwarding handler needs a live destination dispatcher",
            ));
        }
        Ok(Self { destination })
    }

    /// The destination, if it is still alive.
    pub fn destination(&self) -> Option<Arc<EventDispatcher>> {
        self.destination.upgrade()
    }
}

impl EventHandler for ForwardingHandler {
    /// Forwards `event` unless `dispatcher` is the destination; never stops propagation.
    fn handle_event(
        &self,
        dispatcher: &EventDispatcher,
        event: &EventRef,
    ) -> anyhow::Result<bool> {
        let Some(destination) = self.destination.upgrade() else {
            anyhow::bail!("forwarding destination dispatcher was dropped");
        };
        if !std::ptr::eq(dispatcher, Arc::as_ptr(&destination)) {
            tracing::trace!(
                from = %dispatcher.name(),
                to = %destination.name(),
                event = %event.identity(),
                "forwarding event"
            );
            destination.dispatch_event(event);
        }
        Ok(false)
    }

    fn name(&self) -> &str {
        "forwarding"
    }
}
