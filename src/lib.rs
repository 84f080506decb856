//! # eventvisor
//!
//! **Eventvisor** is a small synchronous event-dispatch library for Rust.
//!
//! Handlers are registered per concrete event type with an integer priority.
//! Dispatch walks the chain on the calling thread until a handler stops it.
//! Handler failures and panics never reach the caller: they are turned into
//! [`ErrorEvent`]s and dispatched through the same dispatcher.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐
//!     │ SimpleEvent  │   │  user event  │   │SelfHandlingEvent │
//!     │  (refs = 1)  │   │  (refs = 1)  │   │   (refs = 1)     │
//!     └──────┬───────┘   └──────┬───────┘   └────────┬─────────┘
//!            ▼                  ▼                    ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventDispatcher::dispatch_event(&EventRef)  (calling thread)     │
//! │  - self-handler first (Event::as_handler)                         │
//! │  - HandlerRegistry snapshot for the exact EventType               │
//! │  - run_once per handler: Ok(true) stops, Ok(false) continues      │
//! └──────┬───────────────────────────────────────────────┬────────────┘
//!        │ Err / panic                                   │ Ok(true)
//!        ▼                                               ▼
//! ┌──────────────────────────────┐                 return true
//! │ ErrorEvent                   │
//! │ - source  = dispatcher name  │──► DiagnosticSink::error_raised
//! │ - handled = event (acquired) │──► dispatch_event(error)
//! │ - fault + cause chain        │──► release(error)
//! └──────────────────────────────┘
//!        │ fault while handling an ErrorEvent
//!        ▼
//! DiagnosticSink::fault_dropped   (never redispatched)
//! ```
//!
//! ### Event lifecycle
//! ```text
//! create (refs=1) ──► acquire (refs+1) ... release (refs-1)
//!                                             │
//!                                   refs == 0 ▼
//!                                  dispose() + resource release (once)
//!                                   later acquire/release ─► InvalidState
//! ```
//!
//! ## Features
//! | Area            | Description                                                  | Key types / traits                                  |
//! |-----------------|--------------------------------------------------------------|-----------------------------------------------------|
//! | **Events**      | Reference-counted events with lazy, cached descriptions.     | [`Event`], [`EventCore`], [`EventRef`]              |
//! | **Built-ins**   | General, self-handling and error events.                     | [`SimpleEvent`], [`SelfHandlingEvent`], [`ErrorEvent`] |
//! | **Handlers**    | Priority-ordered chain of responsibility.                    | [`EventHandler`], [`HandlerFn`], [`TypedHandler`]   |
//! | **Forwarding**  | Bridge events from one dispatcher into another.              | [`ForwardingHandler`]                               |
//! | **Dispatch**    | Exact-type registry, synchronous dispatch, fault redispatch. | [`EventDispatcher`], [`RegistrationId`]             |
//! | **Diagnostics** | Report recovered and dropped faults.                         | [`DiagnosticSink`], [`TracingSink`]                 |
//! | **Errors**      | Typed lifecycle errors and captured handler faults.          | [`EventError`], [`HandlerFault`]                    |
//! | **Configuration** | Dispatcher identity and fault handling.                    | [`DispatcherConfig`], [`DispatcherBuilder`]         |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in `LogHandler` _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventvisor::{
//!     DispatcherConfig, ErrorEvent, Event, EventDispatcher, EventRef, SimpleEvent,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dispatcher = EventDispatcher::builder(DispatcherConfig::named("main")?).build();
//!
//!     // Runs first; fails, which is reported but does not stop the chain.
//!     dispatcher.add_fn::<SimpleEvent, _>(0, "flaky", |_d, _ev| {
//!         anyhow::bail!("disk full")
//!     });
//!
//!     // Runs second and stops propagation.
//!     dispatcher.add_fn::<SimpleEvent, _>(10, "writer", |_d, ev| {
//!         println!("writing {}", ev.description());
//!         Ok(true)
//!     });
//!
//!     // Observes the fault raised by "flaky".
//!     dispatcher.add_fn::<ErrorEvent, _>(0, "errors", |_d, err| {
//!         println!("{} failed: {:?}", err.failed_handler().unwrap_or("?"), err.fault());
//!         Ok(false)
//!     });
//!
//!     let ev: EventRef = Arc::new(SimpleEvent::new(None).with_note("hello"));
//!     assert!(dispatcher.dispatch_event(&ev));
//!
//!     // The producer owns the initial reference.
//!     ev.release()?;
//!     assert!(ev.is_disposed());
//!     Ok(())
//! }
//! ```
mod core;
mod diagnostics;
mod error;
mod events;
mod handlers;

// ---- Public re-exports ----

pub use crate::core::{DispatcherBuilder, DispatcherConfig, EventDispatcher, RegistrationId};
pub use diagnostics::{DiagnosticSink, TracingSink};
pub use error::{EventError, HandlerFault, MAX_TRACE_FRAMES};
pub use events::{
    AsAny, ErrorEvent, Event, EventCore, EventRef, EventSource, EventType, SelfHandlingEvent,
    SimpleEvent,
};
pub use handlers::{EventHandler, ForwardingHandler, HandlerFn, HandlerRef, TypedHandler};

// Optional: expose a simple built-in logging handler (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use handlers::LogHandler;
