//! Event handlers.
//!
//! - [`EventHandler`]: the handler contract;
//! - [`HandlerFn`] / [`TypedHandler`]: closure-backed handlers;
//! - [`ForwardingHandler`]: re-dispatches on another dispatcher;
//! - `LogHandler` (feature `logging`): logs every event at `INFO`.

mod forwarding;
mod handler;
#[cfg(feature = "logging")]
mod log;

pub use forwarding::ForwardingHandler;
pub use handler::{EventHandler, HandlerFn, HandlerRef, TypedHandler};
#[cfg(feature = "logging")]
pub use log::LogHandler;
