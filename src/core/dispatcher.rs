//! # Synchronous event dispatcher.
//!
//! [`EventDispatcher`] owns a [`HandlerRegistry`] and delivers events on the
//! calling thread with chain-of-responsibility semantics.
//!
//! ## Dispatch algorithm
//! ```text
//! dispatch_event(ev)
//!   ├─ ev disposed?                  ──► warn, return false
//!   ├─ ev.as_handler() = Some(h)     ──► run_once(h)
//!   │      ├─ Ok(true)               ──► return true
//!   │      ├─ Ok(false)              ──► continue
//!   │      └─ Err(fault)             ──► raise_fault(), continue
//!   ├─ snapshot = registry[exact type of ev]
//!   └─ for reg in snapshot (priority, then registration order):
//!          ├─ ev disposed by a handler? ──► return false
//!          ├─ removed meanwhile?     ──► skip
//!          ├─ Ok(true)               ──► return true
//!          ├─ Ok(false)              ──► next
//!          └─ Err(fault)             ──► raise_fault(), next
//!      return false
//!
//! raise_fault(ev, handler, fault)
//!   ├─ ev is ErrorEvent / redispatch off ──► sink.fault_dropped()   (no recursion)
//!   └─ else: ErrorEvent{source=dispatcher, fault, handled=ev (acquired), handler}
//!            sink.error_raised() ──► dispatch_event(error) ──► error.release()
//! ```
//!
//! ## Rules
//! - Matching is by exact runtime type; no supertype or wrapper matching.
//! - A faulting handler counts as "did not stop".
//! - Faults never propagate to the caller (panics too, unless `catch_panics` is off).
//! - Reentrant: handlers may dispatch and (un)register on any dispatcher,
//!   including this one. No lock is held while a handler runs.
//! - The dispatcher never takes ownership of the events it is given.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::core::builder::DispatcherBuilder;
use crate::core::config::DispatcherConfig;
use crate::core::registry::{HandlerRegistry, Registration, RegistrationId};
use crate::core::runner::run_once;
use crate::diagnostics::DiagnosticSink;
use crate::error::HandlerFault;
use crate::events::{ErrorEvent, Event, EventRef, EventSource, EventType};
use crate::handlers::{HandlerRef, TypedHandler};

/// Registry of handlers plus the synchronous dispatch algorithm.
///
/// Cheap to share: build once, hold as `Arc<EventDispatcher>`.
///
/// # Example
/// ```rust
/// use eventvisor::{Event, EventDispatcher, SimpleEvent};
///
/// let dispatcher = EventDispatcher::new();
/// dispatcher.add_fn::<SimpleEvent, _>(0, "greeter", |_d, ev| {
///     println!("got {}", ev.description());
///     Ok(false)
/// });
///
/// assert!(!dispatcher.dispatch_event(&SimpleEvent::arc(None)));
/// ```
pub struct EventDispatcher {
    cfg: DispatcherConfig,
    registry: HandlerRegistry,
    sink: Arc<dyn DiagnosticSink>,
}

impl EventDispatcher {
    /// Creates a dispatcher with the default configuration and the tracing sink.
    pub fn new() -> Arc<Self> {
        Self::builder(DispatcherConfig::default()).build()
    }

    /// Returns a builder for a dispatcher with custom configuration.
    pub fn builder(cfg: DispatcherConfig) -> DispatcherBuilder {
        DispatcherBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: DispatcherConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            cfg,
            registry: HandlerRegistry::new(),
            sink,
        }
    }

    /// Dispatcher identity; the source of every error event it raises.
    #[inline]
    pub fn name(&self) -> &EventSource {
        &self.cfg.name
    }

    #[inline]
    pub fn config(&self) -> &DispatcherConfig {
        &self.cfg
    }

    /// Registers `handler` for events of exactly type `T`.
    ///
    /// Lower `priority` runs earlier; equal priorities run in registration order.
    pub fn add_handler<T: Event>(&self, priority: i32, handler: HandlerRef) -> RegistrationId {
        self.add_handler_for(priority, EventType::of::<T>(), handler)
    }

    /// Registers `handler` for events of exactly `event_type`.
    pub fn add_handler_for(
        &self,
        priority: i32,
        event_type: EventType,
        handler: HandlerRef,
    ) -> RegistrationId {
        let name = handler.name().to_string();
        let id = self.registry.add(priority, event_type, handler);
        tracing::debug!(
            dispatcher = %self.cfg.name,
            registration = %id,
            priority,
            event_type = event_type.name(),
            handler = name,
            "handler added"
        );
        id
    }

    /// Registers a closure for events of exactly type `T`.
    pub fn add_fn<T, F>(
        &self,
        priority: i32,
        name: impl Into<Cow<'static, str>>,
        f: F,
    ) -> RegistrationId
    where
        T: Event,
        F: Fn(&EventDispatcher, &T) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.add_handler::<T>(priority, TypedHandler::<T, F>::arc(name, f))
    }

    /// Removes a registration.
    ///
    /// Idempotent: returns `false` (and does nothing) if `id` is unknown or
    /// already removed. A dispatch in progress skips the handler if it has not
    /// reached it yet.
    pub fn remove_handler(&self, id: RegistrationId) -> bool {
        let removed = self.registry.remove(id);
        if removed {
            tracing::debug!(dispatcher = %self.cfg.name, registration = %id, "handler removed");
        } else {
            tracing::trace!(dispatcher = %self.cfg.name, registration = %id, "handler not found");
        }
        removed
    }

    /// Number of handlers registered for exactly `event_type`.
    pub fn handler_count(&self, event_type: EventType) -> usize {
        self.registry.count(&event_type)
    }

    /// Whether `id` is still registered.
    pub fn is_registered(&self, id: RegistrationId) -> bool {
        self.registry.contains(id)
    }

    /// Dispatches `event` on the calling thread.
    ///
    /// Returns `true` if the event's self-handler or a registered handler
    /// stopped propagation.
    pub fn dispatch_event(&self, event: &EventRef) -> bool {
        if event.is_disposed() {
            tracing::warn!(
                dispatcher = %self.cfg.name,
                event = %event.identity(),
                "dispatch of disposed event ignored"
            );
            return false;
        }

        if let Some(handler) = event.as_handler() {
            match run_once(handler, self, event, self.cfg.catch_panics) {
                Ok(true) => {
                    tracing::trace!(
                        dispatcher = %self.cfg.name,
                        event = %event.identity(),
                        "stopped by self-handler"
                    );
                    return true;
                }
                Ok(false) => {}
                Err(fault) => self.raise_fault(event, handler.name(), None, fault),
            }
            if self.disposed_mid_dispatch(event) {
                return false;
            }
        }

        let event_type = EventType::of_event(event.as_ref());
        let Some(chain) = self.registry.snapshot(&event_type) else {
            return false;
        };

        for reg in chain.iter().filter(|reg| reg.is_active()) {
            if self.disposed_mid_dispatch(event) {
                return false;
            }
            match run_once(reg.handler.as_ref(), self, event, self.cfg.catch_panics) {
                Ok(true) => {
                    tracing::trace!(
                        dispatcher = %self.cfg.name,
                        event = %event.identity(),
                        registration = %reg.id,
                        "stopped by handler"
                    );
                    return true;
                }
                Ok(false) => {}
                Err(fault) => self.raise_fault(event, reg.handler.name(), Some(reg.as_ref()), fault),
            }
        }
        false
    }

    /// A handler released the last reference; the rest of the chain must not see the event.
    fn disposed_mid_dispatch(&self, event: &EventRef) -> bool {
        if !event.is_disposed() {
            return false;
        }
        tracing::debug!(
            dispatcher = %self.cfg.name,
            event = %event.identity(),
            "event disposed by a handler; dispatch stopped"
        );
        true
    }

    /// Converts a handler fault into an error event and dispatches it.
    ///
    /// `registration` is `None` for a self-handler.
    /// Faults raised while an `ErrorEvent` is being handled are dropped.
    fn raise_fault(
        &self,
        event: &EventRef,
        handler: &str,
        registration: Option<&Registration>,
        fault: HandlerFault,
    ) {
        if event.is::<ErrorEvent>() || !self.cfg.redispatch_faults {
            self.sink.fault_dropped(self, event.as_ref(), handler, &fault);
            return;
        }

        let mut error = ErrorEvent::new(Some(self.cfg.name.clone())).with_failed_handler(handler);
        if let Some(reg) = registration {
            error = error.with_failed_registration(reg.id, &reg.handler);
        }
        if let Err(err) = error.attach_handled_event(event) {
            tracing::debug!(
                dispatcher = %self.cfg.name,
                event = %event.identity(),
                error = %err,
                "faulted event already disposed"
            );
            error = error.with_message(format!("handled event {} was disposed", event.identity()));
        }
        let error = error.with_fault(fault);
        self.sink.error_raised(self, &error);

        let error = error.into_ref();
        self.dispatch_event(&error);
        if let Err(err) = error.release() {
            tracing::warn!(
                dispatcher = %self.cfg.name,
                event = %error.identity(),
                error = %err,
                "error event released by a handler it was not acquired by"
            );
        }
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("name", &self.cfg.name)
            .field("handlers", &self.registry.len())
            .field("sink", &self.sink.name())
            .finish()
    }
}
