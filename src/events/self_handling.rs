//! # Events that handle themselves.
//!
//! A self-handling event is offered to itself before any registered handler
//! runs. Any event type can opt in by returning `Some(self)` from
//! [`Event::as_handler`]; [`SelfHandlingEvent`] is the closure-backed version.
//!
//! ## Rules
//! - The self-handler always runs first, with `event` being the event itself.
//! - `Ok(true)` ends the dispatch; registered handlers do not run.
//! - `Ok(false)` lets registered handlers for the exact event type run afterward.
//!
//! Every closure has its own type, so each `SelfHandlingEvent<F>` is a distinct
//! event type; register handlers for it with [`EventType::of_val`](crate::EventType::of_val).

use std::sync::Arc;

use super::event::{Event, EventCore, EventRef, EventSource};
use crate::core::EventDispatcher;
use crate::handlers::EventHandler;

/// Event whose first-line handler is a closure it carries.
pub struct SelfHandlingEvent<F> {
    core: EventCore,
    f: F,
}

impl<F> SelfHandlingEvent<F>
where
    F: Fn(&EventDispatcher, &EventRef) -> anyhow::Result<bool> + Send + Sync + 'static,
{
    pub fn new(source: Option<EventSource>, f: F) -> Self {
        Self {
            core: EventCore::new(source),
            f,
        }
    }

    /// Creates the event and returns it as a shared handle.
    pub fn arc(source: Option<EventSource>, f: F) -> Arc<Self> {
        Arc::new(Self::new(source, f))
    }
}

impl<F> Event for SelfHandlingEvent<F>
where
    F: Fn(&EventDispatcher, &EventRef) -> anyhow::Result<bool> + Send + Sync + 'static,
{
    fn core(&self) -> &EventCore {
        &self.core
    }

    fn as_handler(&self) -> Option<&dyn EventHandler> {
        Some(self)
    }
}

impl<F> EventHandler for SelfHandlingEvent<F>
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
        Event::name(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventType;
    use crate::handlers::{HandlerFn, HandlerRef};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_handler(count: &Arc<AtomicUsize>) -> HandlerRef {
        let count = Arc::clone(count);
        HandlerFn::arc("counter", move |_d: &EventDispatcher, _e: &EventRef| {
            count.fetch_add(1, Ordering::SeqCst);
            Ok(false)
        })
    }

    #[test]
    fn test_construct_with_and_without_source() {
        let a = SelfHandlingEvent::new(None, |_d: &EventDispatcher, _e: &EventRef| Ok(false));
        let b = SelfHandlingEvent::new(
            Some(EventSource::new("test").unwrap()),
            |_d: &EventDispatcher, _e: &EventRef| Ok(false),
        );
        assert!(a.as_handler().is_some());
        assert_eq!(b.source().map(EventSource::as_str), Some("test"));
    }

    #[test]
    fn test_handle_event_runs_on_dispatch() {
        let dispatcher = EventDispatcher::new();
        let handled = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&handled);
        let ev: EventRef = SelfHandlingEvent::arc(None, move |_d: &EventDispatcher, _e: &EventRef| {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(false)
        });

        assert!(!dispatcher.dispatch_event(&ev));
        assert_eq!(handled.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_self_handled_event_does_not_continue() {
        let dispatcher = EventDispatcher::new();
        let count = Arc::new(AtomicUsize::new(0));
        let handler = counting_handler(&count);

        let inline = Arc::clone(&handler);
        let ev = SelfHandlingEvent::arc(None, move |d: &EventDispatcher, e: &EventRef| {
            inline.handle_event(d, e)?;
            Ok(true)
        });
        dispatcher.add_handler_for(0, EventType::of_val(ev.as_ref()), handler);

        let ev: EventRef = ev;
        assert!(dispatcher.dispatch_event(&ev));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unhandled_event_continues_to_registered_handlers() {
        let dispatcher = EventDispatcher::new();
        let count = Arc::new(AtomicUsize::new(0));
        let handler = counting_handler(&count);

        let inline = Arc::clone(&handler);
        let ev = SelfHandlingEvent::arc(None, move |d: &EventDispatcher, e: &EventRef| {
            inline.handle_event(d, e)?;
            Ok(false)
        });
        dispatcher.add_handler_for(0, EventType::of_val(ev.as_ref()), handler);

        let ev: EventRef = ev;
        assert!(!dispatcher.dispatch_event(&ev));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_self_handler_runs_before_registered_handlers() {
        let dispatcher = EventDispatcher::new();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let o = Arc::clone(&order);
        let ev = SelfHandlingEvent::arc(None, move |_d: &EventDispatcher, _e: &EventRef| {
            o.lock().push("self");
            Ok(false)
        });
        let o = Arc::clone(&order);
        dispatcher.add_handler_for(
            -100,
            EventType::of_val(ev.as_ref()),
            HandlerFn::arc("early", move |_d: &EventDispatcher, _e: &EventRef| {
                o.lock().push("registered");
                Ok(false)
            }),
        );

        let ev: EventRef = ev;
        dispatcher.dispatch_event(&ev);
        assert_eq!(*order.lock(), vec!["self", "registered"]);
    }
}
