//! Error types used by eventvisor events, dispatchers and handlers.
//!
//! This module defines two error types:
//!
//! - [`EventError`] — contract violations surfaced directly to the caller
//!   (bad construction arguments, reference-count misuse).
//! - [`HandlerFault`] — a failure raised from inside a handler during dispatch.
//!   Faults never reach the caller of `dispatch_event`; the dispatcher wraps
//!   them into an [`ErrorEvent`](crate::ErrorEvent) instead.
//!
//! Both types provide `as_label` for logs and tests.

use std::any::Any;

use thiserror::Error;

/// Maximum number of trace frames rendered for a single fault.
pub const MAX_TRACE_FRAMES: usize = 15;

/// # Errors surfaced immediately to the direct caller.
///
/// These are never recovered locally: they indicate the caller broke the
/// construction or lifecycle contract.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// A constructor received an argument it cannot work with.
    #[error("invalid argument: {what}")]
    InvalidArgument {
        /// What was wrong with the argument.
        what: String,
    },

    /// An operation was attempted on an object in the wrong lifecycle state
    /// (e.g. acquiring a disposed event, releasing it twice).
    #[error("invalid state: {what}")]
    InvalidState {
        /// What state the object was in.
        what: String,
    },
}

impl EventError {
    pub(crate) fn invalid_argument(what: impl Into<String>) -> Self {
        EventError::InvalidArgument { what: what.into() }
    }

    pub(crate) fn invalid_state(what: impl Into<String>) -> Self {
        EventError::InvalidState { what: what.into() }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use eventvisor::EventSource;
    ///
    /// let err = EventSource::new("   ").unwrap_err();
    /// assert_eq!(err.as_label(), "invalid_argument");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            EventError::InvalidArgument { .. } => "invalid_argument",
            EventError::InvalidState { .. } => "invalid_state",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            EventError::InvalidArgument { what } => format!("argument: {what}"),
            EventError::InvalidState { what } => format!("state: {what}"),
        }
    }

    /// Returns `true` for [`EventError::InvalidState`].
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, EventError::InvalidState { .. })
    }

    /// Returns `true` for [`EventError::InvalidArgument`].
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, EventError::InvalidArgument { .. })
    }
}

/// # A fault raised by a handler during dispatch.
///
/// Either the handler returned an error, or it panicked and the dispatcher
/// caught the unwind.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HandlerFault {
    /// The handler returned `Err`.
    #[error("{0}")]
    Failed(anyhow::Error),

    /// The handler panicked.
    #[error("panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },
}

impl HandlerFault {
    /// Builds a fault from a panic payload returned by `catch_unwind`.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        HandlerFault::Panicked { message }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerFault::Failed(_) => "handler_failed",
            HandlerFault::Panicked { .. } => "handler_panicked",
        }
    }

    /// Trace lines for this fault, at most [`MAX_TRACE_FRAMES`].
    ///
    /// For returned errors these are the error's causes, outermost first.
    /// A panic carries no trace beyond its message.
    pub fn frames(&self) -> Vec<String> {
        match self {
            HandlerFault::Failed(err) => err
                .chain()
                .skip(1)
                .take(MAX_TRACE_FRAMES)
                .map(|cause| format!("caused by: {cause}"))
                .collect(),
            HandlerFault::Panicked { .. } => Vec::new(),
        }
    }
}

impl From<anyhow::Error> for HandlerFault {
    fn from(err: anyhow::Error) -> Self {
        HandlerFault::Failed(err)
    }
}
