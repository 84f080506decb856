//! # Event contract and shared event state.
//!
//! Every event embeds an [`EventCore`] and implements the [`Event`] trait.
//! The core carries identity and lifecycle state:
//!
//! - **Identity**: a globally unique `id` (monotonic), creation time `at`,
//!   and an optional [`EventSource`] naming the originating object.
//! - **Description**: built lazily on first use and cached.
//! - **Reference count**: starts at 1 for the creator. [`Event::acquire`]
//!   adds a holder, [`Event::release`] drops one. When the count reaches zero
//!   the event is disposed: the type's [`Event::dispose`] hook runs, then any
//!   resource registered with [`EventCore::with_resource`] is freed.
//!
//! ## Lifecycle
//! ```text
//! new() ──► refs=1 ──acquire()──► refs=2 ──release()──► refs=1 ──release()──► refs=0
//!                                                                              │
//!                                                        dispose() + free resource
//!                                                        acquire()/release() ─► InvalidState
//! ```
//!
//! ## Rules
//! - Whoever keeps an event beyond the call that delivered it must `acquire`
//!   it and later `release` it exactly once.
//! - The counter is atomic; an event may be shared across threads.
//! - If an event with a pending resource is dropped while still referenced,
//!   the resource is freed at drop time and a warning is logged.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventvisor::{Event, EventRef, EventSource, SimpleEvent};
//!
//! let ev: EventRef = Arc::new(SimpleEvent::new(Some(EventSource::new("producer")?)));
//! ev.acquire()?;
//! assert_eq!(ev.ref_count(), 2);
//! ev.release()?;
//! ev.release()?;
//! assert!(ev.is_disposed());
//! assert!(ev.acquire().is_err());
//! # Ok::<(), eventvisor::EventError>(())
//! ```

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::SystemTime;

use parking_lot::Mutex;

use crate::error::EventError;
use crate::handlers::EventHandler;

/// Global sequence counter for event identity.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Shared handle to a type-erased event.
pub type EventRef = Arc<dyn Event>;

type Releaser = Box<dyn FnOnce() + Send>;

/// Access to an event as [`Any`], used for exact-type matching and downcasts.
///
/// Implemented for every `'static` type; there is no need to implement it by hand.
pub trait AsAny: Any {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Validated label naming the object an event originated from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventSource(Arc<str>);

impl EventSource {
    /// Creates a source label.
    ///
    /// Surrounding whitespace is trimmed; an empty label is rejected with
    /// [`EventError::InvalidArgument`].
    pub fn new(name: impl AsRef<str>) -> Result<Self, EventError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(EventError::invalid_argument("event source must not be empty"));
        }
        Ok(Self(Arc::from(name)))
    }

    pub(crate) fn from_static(name: &'static str) -> Self {
        Self(Arc::from(name))
    }

    /// The label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for EventSource {
    type Error = EventError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for EventSource {
    type Error = EventError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identity, description cache and reference count shared by all events.
pub struct EventCore {
    id: u64,
    at: SystemTime,
    source: Option<EventSource>,
    refs: AtomicUsize,
    resource: Mutex<Option<Releaser>>,
    pub(crate) description: OnceLock<String>,
}

impl EventCore {
    /// Creates the state for a new event, held once by its creator.
    pub fn new(source: Option<EventSource>) -> Self {
        Self {
            id: EVENT_SEQ.fetch_add(1, Ordering::Relaxed),
            at: SystemTime::now(),
            source,
            refs: AtomicUsize::new(1),
            resource: Mutex::new(None),
            description: OnceLock::new(),
        }
    }

    /// Registers a wrapped resource, freed exactly once when the count reaches zero.
    #[must_use]
    pub fn with_resource(self, release: impl FnOnce() + Send + 'static) -> Self {
        *self.resource.lock() = Some(Box::new(release));
        self
    }

    /// Globally unique, monotonically increasing event id.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wall-clock creation time.
    #[inline]
    pub fn at(&self) -> SystemTime {
        self.at
    }

    #[inline]
    pub fn source(&self) -> Option<&EventSource> {
        self.source.as_ref()
    }

    /// Current number of holders; `0` once disposed.
    #[inline]
    pub fn ref_count(&self) -> usize {
        self.refs.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.ref_count() == 0
    }

    /// Writes the base description: `{name}#{id};source={source};`.
    ///
    /// Event types that extend the description call this first and append
    /// their own fields after it.
    pub fn describe_base(&self, name: &str, out: &mut String) {
        use std::fmt::Write;

        let _ = write!(out, "{name}#{};source=", self.id);
        match &self.source {
            Some(source) => out.push_str(source.as_str()),
            None => out.push_str("<none>"),
        }
        out.push(';');
    }

    pub(crate) fn acquire(&self) -> Result<(), EventError> {
        let mut current = self.refs.load(Ordering::Acquire);
        loop {
            if current == 0 {
                return Err(EventError::invalid_state(format!(
                    "acquire on disposed event #{}",
                    self.id
                )));
            }
            match self.refs.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(()),
                Err(actual) => current = actual,
            }
        }
    }

    /// Drops one holder. Returns `true` if this call disposed the event.
    pub(crate) fn release(&self) -> Result<bool, EventError> {
        let mut current = self.refs.load(Ordering::Acquire);
        loop {
            if current == 0 {
                return Err(EventError::invalid_state(format!(
                    "release on disposed event #{}",
                    self.id
                )));
            }
            match self.refs.compare_exchange_weak(
                current,
                current - 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(current == 1),
                Err(actual) => current = actual,
            }
        }
    }

    pub(crate) fn free_resource(&self) {
        let release = self.resource.lock().take();
        if let Some(release) = release {
            release();
        }
    }
}

impl Drop for EventCore {
    fn drop(&mut self) {
        let pending = self.resource.get_mut().take();
        if let Some(release) = pending {
            tracing::warn!(
                event = self.id,
                refs = *self.refs.get_mut(),
                "event dropped without final release; freeing its resource"
            );
            release();
        }
    }
}

impl fmt::Debug for EventCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventCore")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("refs", &self.ref_count())
            .finish()
    }
}

/// # A unit of notification flowing through an [`EventDispatcher`](crate::EventDispatcher).
///
/// Implementors only provide [`core`](Event::core); everything else has a
/// default. Dispatch matches on the exact runtime type of the implementor.
///
/// # Example
/// ```
/// use eventvisor::{Event, EventCore};
///
/// struct Tick {
///     core: EventCore,
///     n: u64,
/// }
///
/// impl Event for Tick {
///     fn core(&self) -> &EventCore {
///         &self.core
///     }
///
///     fn describe(&self, out: &mut String) {
///         self.core.describe_base(self.name(), out);
///         out.push_str(&format!("n={};", self.n));
///     }
/// }
///
/// let tick = Tick { core: EventCore::new(None), n: 7 };
/// assert!(tick.description().ends_with("n=7;"));
/// ```
pub trait Event: AsAny + Send + Sync {
    /// Shared identity and lifecycle state.
    fn core(&self) -> &EventCore;

    /// Human-readable type name (for logs and descriptions).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the handler view of a self-handling event, `None` otherwise.
    fn as_handler(&self) -> Option<&dyn EventHandler> {
        None
    }

    /// Writes this event's description into `out`.
    ///
    /// Overrides must write the base description first
    /// (see [`EventCore::describe_base`]) and append after it.
    fn describe(&self, out: &mut String) {
        self.core().describe_base(self.name(), out);
    }

    /// Hook run once when the reference count reaches zero, before the
    /// wrapped resource is freed.
    fn dispose(&self) {}

    /// Lazily built, cached description.
    fn description(&self) -> &str {
        self.core().description.get_or_init(|| {
            let mut out = String::new();
            self.describe(&mut out);
            out
        })
    }

    /// Adds a holder. Fails with [`EventError::InvalidState`] after disposal.
    fn acquire(&self) -> Result<(), EventError> {
        self.core().acquire()
    }

    /// Drops a holder; the last release disposes the event.
    ///
    /// Fails with [`EventError::InvalidState`] on a disposed event.
    fn release(&self) -> Result<(), EventError> {
        if self.core().release()? {
            self.dispose();
            self.core().free_resource();
        }
        Ok(())
    }

    fn ref_count(&self) -> usize {
        self.core().ref_count()
    }

    fn is_disposed(&self) -> bool {
        self.core().is_disposed()
    }

    fn id(&self) -> u64 {
        self.core().id()
    }

    fn source(&self) -> Option<&EventSource> {
        self.core().source()
    }

    /// Short identity: `{name}#{id}`.
    fn identity(&self) -> String {
        format!("{}#{}", self.name(), self.id())
    }
}

impl dyn Event {
    /// Returns `true` if the event's runtime type is exactly `T`.
    #[inline]
    pub fn is<T: Event>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Downcasts to the concrete event type `T`.
    #[inline]
    pub fn downcast_ref<T: Event>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

impl fmt::Display for dyn Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl fmt::Debug for dyn Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name())
            .field("id", &self.id())
            .field("refs", &self.ref_count())
            .finish()
    }
}
