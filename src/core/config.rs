//! # Dispatcher configuration.
//!
//! Provides [`DispatcherConfig`], the settings a dispatcher is built with.
//!
//! ## Defaults
//! - `name = "dispatcher"`
//! - `catch_panics = true` (handler panics become error events)
//! - `redispatch_faults = true` (handler faults are dispatched as [`ErrorEvent`](crate::ErrorEvent)s)

use crate::events::EventSource;

/// Configuration for an [`EventDispatcher`](crate::EventDispatcher).
///
/// ## Field semantics
/// - `name`: identity of the dispatcher; the source of every error event it creates
/// - `catch_panics`: catch handler panics at the dispatch boundary (`false` = let them unwind to the caller)
/// - `redispatch_faults`: wrap faults into error events and dispatch them (`false` = report to the sink only)
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    /// Dispatcher identity used in logs and as the source of generated error events.
    pub name: EventSource,

    /// Whether handler panics are caught and treated as faults.
    ///
    /// With `false`, a panicking handler unwinds through `dispatch_event`.
    pub catch_panics: bool,

    /// Whether handler faults are dispatched as error events.
    ///
    /// With `false`, faults go to the diagnostic sink and are dropped.
    pub redispatch_faults: bool,
}

impl DispatcherConfig {
    /// Default configuration with a custom name.
    ///
    /// Fails with [`EventError::InvalidArgument`](crate::EventError::InvalidArgument)
    /// on a blank name.
    pub fn named(name: impl AsRef<str>) -> Result<Self, crate::EventError> {
        Ok(Self {
            name: EventSource::new(name)?,
            ..Self::default()
        })
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            name: EventSource::from_static("dispatcher"),
            catch_panics: true,
            redispatch_faults: true,
        }
    }
}
