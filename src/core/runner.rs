//! # Run a single handler invocation.
//!
//! Calls one [`EventHandler`] and converts whatever goes wrong into a
//! [`HandlerFault`]:
//!
//! ```text
//! Ok(true)  ──► Ok(true)    stop propagation
//! Ok(false) ──► Ok(false)   continue
//! Err(e)    ──► Err(HandlerFault::Failed(e))
//! panic     ──► Err(HandlerFault::Panicked { .. })   (only when catch_panics)
//! ```
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state
//! inconsistent if a handler panics while holding a lock.

use std::panic::{self, AssertUnwindSafe};

use crate::core::EventDispatcher;
use crate::error::HandlerFault;
use crate::events::EventRef;
use crate::handlers::EventHandler;

/// Invokes `handler` once for `event`.
pub(crate) fn run_once(
    handler: &dyn EventHandler,
    dispatcher: &EventDispatcher,
    event: &EventRef,
    catch_panics: bool,
) -> Result<bool, HandlerFault> {
    if !catch_panics {
        return handler
            .handle_event(dispatcher, event)
            .map_err(HandlerFault::Failed);
    }

    match panic::catch_unwind(AssertUnwindSafe(|| handler.handle_event(dispatcher, event))) {
        Ok(result) => result.map_err(HandlerFault::Failed),
        Err(payload) => Err(HandlerFault::from_panic(payload)),
    }
}
