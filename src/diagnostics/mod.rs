//! # Diagnostics for recovered handler faults.
//!
//! The dispatcher never lets a handler fault reach the caller of
//! `dispatch_event`. Instead it reports to an injected [`DiagnosticSink`]:
//!
//! ```text
//! handler fault ──► ErrorEvent ──► sink.error_raised() ──► dispatch_event(error)
//!                                                             │
//!                                      fault while handling ──┘
//!                                                 │
//!                                                 ▼
//!                                      sink.fault_dropped()   (never redispatched)
//! ```
//!
//! [`TracingSink`] is the default; replace it with
//! [`DispatcherBuilder::with_sink`](crate::DispatcherBuilder::with_sink).

mod log;
mod sink;

pub use log::TracingSink;
pub use sink::DiagnosticSink;
