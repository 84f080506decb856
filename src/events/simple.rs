//! # General-purpose event.
//!
//! [`SimpleEvent`] is a ready-made event with no payload beyond its source
//! and an optional note. Use it for plain notifications, or as the model for
//! your own event types.

use std::sync::Arc;

use super::event::{Event, EventCore, EventRef, EventSource};

/// Event with an optional source and free-form note.
#[derive(Debug)]
pub struct SimpleEvent {
    core: EventCore,
    note: Option<String>,
}

impl SimpleEvent {
    /// Creates a new event held once by the caller.
    pub fn new(source: Option<EventSource>) -> Self {
        Self {
            core: EventCore::new(source),
            note: None,
        }
    }

    /// Creates the event and returns it as a type-erased shared handle,
    /// ready for [`dispatch_event`](crate::EventDispatcher::dispatch_event).
    pub fn arc(source: Option<EventSource>) -> EventRef {
        Arc::new(Self::new(source))
    }

    /// Attaches a note, rendered in the description.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Attaches a resource freed when the last holder releases the event.
    #[must_use]
    pub fn with_resource(mut self, release: impl FnOnce() + Send + 'static) -> Self {
        self.core = self.core.with_resource(release);
        self
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

impl Event for SimpleEvent {
    fn core(&self) -> &EventCore {
        &self.core
    }

    fn describe(&self, out: &mut String) {
        self.core.describe_base(self.name(), out);
        if let Some(note) = &self.note {
            out.push_str("note=");
            out.push_str(note);
            out.push(';');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EventDispatcher;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_note_in_description() {
        let ev = SimpleEvent::new(None).with_note("hello");
        assert_eq!(ev.note(), Some("hello"));
        assert!(ev.description().ends_with("source=<none>;note=hello;"));
    }

    #[test]
    fn test_arc_handle_dispatches_directly() {
        let dispatcher = EventDispatcher::new();
        dispatcher.add_fn::<SimpleEvent, _>(0, "stop", |_d, _e| Ok(true));

        let ev = SimpleEvent::arc(None);
        assert!(ev.is::<SimpleEvent>());
        assert!(dispatcher.dispatch_event(&ev));
        assert_eq!(ev.ref_count(), 1);
    }

    #[test]
    fn test_resource_released_with_last_holder() {
        let freed = Arc::new(AtomicUsize::new(0));
        let f = Arc::clone(&freed);
        let ev = SimpleEvent::new(None).with_resource(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });
        ev.release().unwrap();
        assert_eq!(freed.load(Ordering::SeqCst), 1);
        assert!(ev.release().is_err());
        assert_eq!(freed.load(Ordering::SeqCst), 1);
    }
}
