//! # Error events raised for handler faults.
//!
//! When a handler fails during dispatch, the dispatcher builds an
//! [`ErrorEvent`] and dispatches it through itself, so handlers registered
//! for `ErrorEvent` can observe and log failures.
//!
//! An error event holds one acquired reference to the event that was being
//! handled. That reference is released exactly once: when the error event is
//! disposed (its own count reaches zero), or, failing that, when it is dropped.
//!
//! ## Description layout
//! ```text
//! {base};event={name}#{id};handler={name};registration={reg-n};
//! message={message};trace=
//! {fault}
//! {frame 1}
//! ...
//! {frame n ≤ 15}
//! ;
//! ```
//! Field order is fixed (event, handler, registration, message, trace); each part is
//! present only when set.
//!
//! ## Example
//! ```rust
//! use eventvisor::{ErrorEvent, Event, EventRef, SimpleEvent};
//!
//! let handled: EventRef = SimpleEvent::arc(None);
//! let error = ErrorEvent::new(None)
//!     .with_message("lost connection")
//!     .with_handled_event(&handled)?;
//! assert_eq!(handled.ref_count(), 2);
//!
//! error.release()?;
//! assert_eq!(handled.ref_count(), 1);
//! # Ok::<(), eventvisor::EventError>(())
//! ```

use std::fmt::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use super::event::{Event, EventCore, EventRef, EventSource};
use crate::core::RegistrationId;
use crate::error::{EventError, HandlerFault};
use crate::handlers::{EventHandler, HandlerRef};

/// Event describing a failure, optionally tied to the event being handled.
pub struct ErrorEvent {
    core: EventCore,
    fault: Option<HandlerFault>,
    message: Option<String>,
    handled: Option<EventRef>,
    handled_released: AtomicBool,
    failed_handler: Option<String>,
    failed_registration: Option<(RegistrationId, Weak<dyn EventHandler>)>,
}

impl ErrorEvent {
    /// Creates an error event with only a source; add details with the `with_*` methods.
    pub fn new(source: Option<EventSource>) -> Self {
        Self {
            core: EventCore::new(source),
            fault: None,
            message: None,
            handled: None,
            handled_released: AtomicBool::new(false),
            failed_handler: None,
            failed_registration: None,
        }
    }

    /// Attaches the fault that caused this error.
    #[must_use]
    pub fn with_fault(mut self, fault: HandlerFault) -> Self {
        self.fault = Some(fault);
        self
    }

    /// Attaches a free-form message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Ties this error to the event being handled, acquiring one reference to it.
    ///
    /// Fails with [`EventError::InvalidState`] if `event` is already disposed.
    /// Replacing a previously attached event releases that one.
    pub fn with_handled_event(mut self, event: &EventRef) -> Result<Self, EventError> {
        self.attach_handled_event(event)?;
        Ok(self)
    }

    /// In-place form of [`with_handled_event`](Self::with_handled_event).
    ///
    /// On failure the error event is left unchanged.
    pub fn attach_handled_event(&mut self, event: &EventRef) -> Result<(), EventError> {
        event.acquire()?;
        self.release_handled();
        self.handled = Some(EventRef::clone(event));
        self.handled_released = AtomicBool::new(false);
        Ok(())
    }

    /// Names the handler the fault came from. Only the identity is kept.
    #[must_use]
    pub fn with_failed_handler(mut self, name: impl Into<String>) -> Self {
        self.failed_handler = Some(name.into());
        self
    }

    /// Finishes construction as a shared handle.
    pub fn into_ref(self) -> EventRef {
        Arc::new(self)
    }

    /// Records which registration faulted. The handler is held weakly.
    ///
    /// Not set when the fault came from a self-handling event.
    #[must_use]
    pub fn with_failed_registration(mut self, id: RegistrationId, handler: &HandlerRef) -> Self {
        self.failed_registration = Some((id, Arc::downgrade(handler)));
        self
    }

    pub fn fault(&self) -> Option<&HandlerFault> {
        self.fault.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The event that was being handled when the fault occurred.
    pub fn handled_event(&self) -> Option<&EventRef> {
        self.handled.as_ref()
    }

    /// Name of the handler the fault came from.
    pub fn failed_handler(&self) -> Option<&str> {
        self.failed_handler.as_deref()
    }

    /// Registration of the handler the fault came from; pass it to
    /// [`remove_handler`](crate::EventDispatcher::remove_handler) to drop it.
    pub fn failed_registration(&self) -> Option<RegistrationId> {
        self.failed_registration.as_ref().map(|(id, _)| *id)
    }

    /// The failing handler, if it is still alive.
    pub fn failed_handler_ref(&self) -> Option<HandlerRef> {
        self.failed_registration
            .as_ref()
            .and_then(|(_, handler)| handler.upgrade())
    }

    fn release_handled(&self) {
        if self.handled_released.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(handled) = &self.handled {
            if let Err(err) = handled.release() {
                tracing::warn!(
                    error = %err,
                    event = %handled.identity(),
                    "error event could not release its handled event"
                );
            }
        }
    }
}

impl Event for ErrorEvent {
    fn core(&self) -> &EventCore {
        &self.core
    }

    fn describe(&self, out: &mut String) {
        self.core.describe_base(self.name(), out);

        if let Some(event) = &self.handled {
            let _ = write!(out, "event={};", event.identity());
        }
        if let Some(handler) = &self.failed_handler {
            let _ = write!(out, "handler={handler};");
        }
        if let Some((id, _)) = &self.failed_registration {
            let _ = write!(out, "registration={id};");
        }
        if let Some(message) = self.message.as_deref().filter(|m| !m.is_empty()) {
            let _ = write!(out, "\nmessage={message};");
        }
        if let Some(fault) = &self.fault {
            let _ = writeln!(out, "trace=\n{fault}");
            let frames = fault.frames();
            if !frames.is_empty() {
                for frame in frames {
                    out.push_str(&frame);
                    out.push('\n');
                }
                out.push(';');
            }
        }
    }

    fn dispose(&self) {
        self.release_handled();
    }
}

impl Drop for ErrorEvent {
    fn drop(&mut self) {
        self.release_handled();
    }
}

impl std::fmt::Debug for ErrorEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorEvent")
            .field("core", &self.core)
            .field("fault", &self.fault)
            .field("message", &self.message)
            .field("handled", &self.handled.as_ref().map(|e| e.identity()))
            .field("failed_handler", &self.failed_handler)
            .field("failed_registration", &self.failed_registration())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EventDispatcher;
    use crate::events::SimpleEvent;
    use crate::handlers::HandlerFn;
    use anyhow::Context;

    fn fault() -> HandlerFault {
        Err::<(), _>(anyhow::anyhow!("socket closed"))
            .context("send frame")
            .unwrap_err()
            .into()
    }

    #[test]
    fn test_construction_acquires_handled_event() {
        let handled: EventRef = SimpleEvent::arc(None);
        let error = ErrorEvent::new(None).with_handled_event(&handled).unwrap();
        assert_eq!(handled.ref_count(), 2);

        error.release().unwrap();
        assert_eq!(handled.ref_count(), 1);
        assert!(error.is_disposed());

        drop(error);
        assert_eq!(handled.ref_count(), 1, "drop released the handled event again");
    }

    #[test]
    fn test_drop_without_release_releases_handled_event() {
        let handled: EventRef = SimpleEvent::arc(None);
        let error = ErrorEvent::new(None).with_handled_event(&handled).unwrap();
        drop(error);
        assert_eq!(handled.ref_count(), 1);
    }

    #[test]
    fn test_handled_event_must_be_live() {
        let handled: EventRef = SimpleEvent::arc(None);
        handled.release().unwrap();

        let err = ErrorEvent::new(None).with_handled_event(&handled).unwrap_err();
        assert!(err.is_invalid_state());
    }

    #[test]
    fn test_shared_error_event_releases_handled_once() {
        let handled: EventRef = SimpleEvent::arc(None);
        let error = ErrorEvent::new(None)
            .with_handled_event(&handled)
            .unwrap()
            .into_ref();

        error.acquire().unwrap();
        error.release().unwrap();
        assert_eq!(handled.ref_count(), 2);
        error.release().unwrap();
        assert_eq!(handled.ref_count(), 1);
        assert!(error.release().is_err());
        assert_eq!(handled.ref_count(), 1);
    }

    #[test]
    fn test_replacing_handled_event_releases_previous() {
        let first: EventRef = SimpleEvent::arc(None);
        let second: EventRef = SimpleEvent::arc(None);
        let error = ErrorEvent::new(None)
            .with_handled_event(&first)
            .unwrap()
            .with_handled_event(&second)
            .unwrap();

        assert_eq!(first.ref_count(), 1);
        assert_eq!(second.ref_count(), 2);
        drop(error);
        assert_eq!(second.ref_count(), 1);
    }

    #[test]
    fn test_description_field_order() {
        let handled: EventRef = SimpleEvent::arc(None);
        let error = ErrorEvent::new(Some(EventSource::new("disp").unwrap()))
            .with_fault(fault())
            .with_message("boom")
            .with_handled_event(&handled)
            .unwrap()
            .with_failed_handler("writer");

        let desc = error.description();
        let event_at = desc.find("event=").unwrap();
        let handler_at = desc.find("handler=writer;").unwrap();
        let message_at = desc.find("\nmessage=boom;").unwrap();
        let trace_at = desc.find("trace=\nsend frame\n").unwrap();

        assert!(desc.contains("source=disp;"));
        assert!(desc.contains(&format!("event={};", handled.identity())));
        assert!(event_at < handler_at && handler_at < message_at && message_at < trace_at);
        assert!(desc.ends_with("caused by: socket closed\n;"));
    }

    #[test]
    fn test_failed_registration_is_weak_and_described() {
        let dispatcher = EventDispatcher::new();
        let handler: HandlerRef =
            HandlerFn::arc("writer", |_d: &EventDispatcher, _e: &EventRef| Ok(false));
        let id = dispatcher.add_handler::<SimpleEvent>(0, Arc::clone(&handler));

        let error = ErrorEvent::new(None)
            .with_failed_handler("writer")
            .with_failed_registration(id, &handler);

        assert_eq!(error.failed_registration(), Some(id));
        assert!(error.failed_handler_ref().is_some());
        let desc = error.description();
        assert!(desc.contains(&format!("handler=writer;registration={id};")));

        assert!(dispatcher.remove_handler(id));
        drop(handler);
        assert!(error.failed_handler_ref().is_none(), "error event must not own the handler");
        assert_eq!(error.failed_registration(), Some(id));
    }

    #[test]
    fn test_description_omits_unset_fields() {
        let error = ErrorEvent::new(None).with_message("");
        let desc = error.description();
        assert!(!desc.contains("event="));
        assert!(!desc.contains("handler="));
        assert!(!desc.contains("registration="));
        assert!(!desc.contains("message="));
        assert!(!desc.contains("trace="));
    }

    #[test]
    fn test_trace_is_capped_at_fifteen_frames() {
        let mut err = anyhow::anyhow!("root");
        for i in 0..30 {
            err = err.context(format!("layer {i}"));
        }
        let error = ErrorEvent::new(None).with_fault(err.into());
        let frames = error
            .description()
            .lines()
            .filter(|l| l.starts_with("caused by: "))
            .count();
        assert_eq!(frames, crate::error::MAX_TRACE_FRAMES);
    }
}
