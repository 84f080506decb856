//! Events: the lifecycle contract and the built-in event types.
//!
//! ## Contents
//! - [`Event`], [`EventCore`], [`EventRef`] the event contract, shared state and handle
//! - [`EventSource`] validated origin label
//! - [`EventType`] exact runtime type tag used as the registry key
//! - [`SimpleEvent`] general-purpose event
//! - [`SelfHandlingEvent`] event that is its own first-line handler
//! - [`ErrorEvent`] handler fault raised during dispatch
//!
//! ## Quick reference
//! - **Producers** create an event (refs = 1) and call
//!   [`EventDispatcher::dispatch_event`](crate::EventDispatcher::dispatch_event).
//! - **Handlers** borrow the event for the call; keeping it means `acquire` now
//!   and `release` later.
//! - **The dispatcher** creates `ErrorEvent`s itself and releases them after
//!   their dispatch returns.

mod error_event;
mod event;
mod kind;
mod self_handling;
mod simple;

pub use error_event::ErrorEvent;
pub use event::{AsAny, Event, EventCore, EventRef, EventSource};
pub use kind::EventType;
pub use self_handling::SelfHandlingEvent;
pub use simple::SimpleEvent;
