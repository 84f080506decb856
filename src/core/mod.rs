//! Dispatch core: registry and dispatch algorithm.
//!
//! The only public entry points from this module are [`EventDispatcher`]
//! and its [`DispatcherBuilder`] / [`DispatcherConfig`].
//!
//! Internal modules:
//! - [`dispatcher`]: the dispatch algorithm and fault redispatch;
//! - [`registry`]: per-type, priority-ordered handler chains (copy-on-write);
//! - [`runner`]: invokes one handler and captures its failure or panic;
//! - [`builder`]: assembles a dispatcher with an optional diagnostic sink;
//! - [`config`]: dispatcher configuration.

mod builder;
mod config;
mod dispatcher;
mod registry;
mod runner;

pub use builder::DispatcherBuilder;
pub use config::DispatcherConfig;
pub use dispatcher::EventDispatcher;
pub use registry::RegistrationId;
