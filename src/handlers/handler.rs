//! # Event handler trait and closure-backed handlers.
//!
//! [`EventHandler`] is the extension point for reacting to dispatched events.
//! A handler returns:
//! - `Ok(true)`  — stop: no later handler sees this dispatch;
//! - `Ok(false)` — continue with the next handler in priority order;
//! - `Err(_)`    — a fault: the dispatcher wraps it into an
//!   [`ErrorEvent`](crate::ErrorEvent) and keeps going. Panics are treated the same way.
//!
//! ## Architecture
//! ```text
//! dispatch_event(ev)
//!     │
//!     ├──► [self-handler]   ev.as_handler()?.handle_event()  ── true ──► stop
//!     │
//!     └──► [registrations for exact type, by priority]
//!             h1.handle_event() ── false ──► h2.handle_event() ── true ──► stop
//!                     │
//!                     └── Err / panic ──► ErrorEvent ──► dispatch_event(error)
//! ```
//!
//! ## Closure handlers
//! - [`HandlerFn`] wraps `Fn(&EventDispatcher, &EventRef) -> anyhow::Result<bool>`.
//! - [`TypedHandler`] wraps `Fn(&EventDispatcher, &T) -> anyhow::Result<bool>` and
//!   downcasts the event to `T` first.
//!
//! ## Example
//! ```rust
//! use eventvisor::{EventDispatcher, EventRef, HandlerFn, HandlerRef, SimpleEvent};
//!
//! let dispatcher = EventDispatcher::new();
//! let stop_all: HandlerRef =
//!     HandlerFn::arc("stop-all", |_d: &EventDispatcher, _e: &EventRef| Ok(true));
//! dispatcher.add_handler::<SimpleEvent>(0, stop_all);
//!
//! let stopped = dispatcher.dispatch_event(&SimpleEvent::arc(None));
//! assert!(stopped);
//! ```

use std::borrow::Cow;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::core::EventDispatcher;
use crate::events::{Event, EventRef};

/// Shared handle to a handler.
pub type HandlerRef = Arc<dyn EventHandler>;

/// Contract for event handlers.
///
/// Called synchronously on the dispatching thread. `dispatcher` is the
/// dispatcher delivering the event; handlers may dispatch further events or
/// change registrations through it.
///
/// The event is borrowed for the duration of the call. To keep it afterwards,
/// clone the handle and [`acquire`](crate::Event::acquire) it.
pub trait EventHandler: Send + Sync + 'static {
    /// Handles one event; `Ok(true)` stops further propagation.
    fn handle_event(&self, dispatcher: &EventDispatcher, event: &EventRef)
        -> anyhow::Result<bool>;

    /// Returns the handler name used in logs and error events.
    ///
    /// The default uses `type_name::<Self>()`; override it with something short.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Function-backed handler.
pub struct HandlerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> HandlerFn<F>
where
    F: Fn(&EventDispatcher, &EventRef) -> anyhow::Result<bool> + Send + Sync + 'static,
{
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`HandlerFn::arc`] when you immediately need a [`HandlerRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> EventHandler for HandlerFn<F>
where
    F: Fn(&EventDispatcher, &EventRef) -> anyhow::Result<bool> + Send + Sync + 'static,
{
    fn handle_event(
        &self,
        dispatcher: &EventDispatcher,
        event: &EventRef,
    ) -> anyhow::Result<bool> {
        (self.f)(dispatcher, event)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Handler that only accepts events of the concrete type `T`.
///
/// Receiving any other type is reported as a fault.
pub struct TypedHandler<T, F> {
    name: Cow<'static, str>,
    f: F,
    _event: PhantomData<fn(&T)>,
}

impl<T, F> TypedHandler<T, F>
where
    T: Event,
    F: Fn(&EventDispatcher, &T) -> anyhow::Result<bool> + Send + Sync + 'static,
{
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            _event: PhantomData,
        }
    }

    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<T, F> EventHandler for TypedHandler<T, F>
where
    T: Event,
    F: Fn(&EventDispatcher, &T) -> anyhow::Result<bool> + Send + Sync + 'static,
{
    fn handle_event(
        &self,
        dispatcher: &EventDispatcher,
        event: &EventRef,
    ) -> anyhow::Result<bool> {
        match event.downcast_ref::<T>() {
            Some(typed) => (self.f)(dispatcher, typed),
            None => anyhow::bail!(
                "handler `{}` expects {}, got {}",
                self.name,
                std::any::type_name::<T>(),
                event.name()
            ),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventCore, EventType, SimpleEvent};

    struct Other {
        core: EventCore,
    }

    impl Event for Other {
        fn core(&self) -> &EventCore {
            &self.core
        }
    }

    #[test]
    fn test_handler_fn_name_and_result() {
        let dispatcher = EventDispatcher::new();
        let h = HandlerFn::new("stopper", |_d: &EventDispatcher, _e: &EventRef| Ok(true));
        let ev: EventRef = SimpleEvent::arc(None);

        assert_eq!(h.name(), "stopper");
        assert!(h.handle_event(&dispatcher, &ev).unwrap());
    }

    #[test]
    fn test_typed_handler_sees_concrete_event() {
        let dispatcher = EventDispatcher::new();
        let h = TypedHandler::new("note", |_d: &EventDispatcher, e: &SimpleEvent| {
            Ok(e.note() == Some("stop"))
        });

        let ev: EventRef = Arc::new(SimpleEvent::new(None).with_note("stop"));
        assert!(h.handle_event(&dispatcher, &ev).unwrap());
    }

    #[test]
    fn test_typed_handler_rejects_other_types() {
        let dispatcher = EventDispatcher::new();
        let h = TypedHandler::new("simple-only", |_d: &EventDispatcher, _e: &SimpleEvent| {
            Ok(false)
        });

        let ev: EventRef = Arc::new(Other { core: EventCore::new(None) });
        let err = h.handle_event(&dispatcher, &ev).unwrap_err();
        assert!(err.to_string().contains("simple-only"));
        assert!(err.to_string().contains(EventType::of::<Other>().name()));
    }
}
