//! # Exact runtime type tag for events.
//!
//! [`EventType`] is the key handlers are registered under. Matching is by
//! exact [`TypeId`]: a handler registered for one event type is never invoked
//! for another, even if the two are related through wrapping or generics.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::event::Event;

/// Type tag of a concrete event type.
///
/// Equality and hashing use only the [`TypeId`]; the name is kept for logs.
#[derive(Clone, Copy, Debug)]
pub struct EventType {
    id: TypeId,
    name: &'static str,
}

impl EventType {
    /// Tag for the event type `T`.
    pub fn of<T: Event>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Tag for the type of a concrete value (useful when `T` cannot be named,
    /// e.g. events parameterized by a closure).
    pub fn of_val<T: Event>(_event: &T) -> Self {
        Self::of::<T>()
    }

    /// Tag for the runtime type behind a type-erased event.
    pub fn of_event(event: &dyn Event) -> Self {
        Self {
            id: Any::type_id(event.as_any()),
            name: event.name(),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for EventType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventType {}

impl Hash for EventType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventCore, EventRef, SimpleEvent};
    use std::sync::Arc;

    struct Other {
        core: EventCore,
    }

    impl Event for Other {
        fn core(&self) -> &EventCore {
            &self.core
        }
    }

    #[test]
    fn test_erased_event_matches_static_tag() {
        let ev: EventRef = Arc::new(SimpleEvent::new(None));
        assert_eq!(EventType::of_event(ev.as_ref()), EventType::of::<SimpleEvent>());
        assert_ne!(EventType::of_event(ev.as_ref()), EventType::of::<Other>());
    }

    #[test]
    fn test_of_val_matches_of() {
        let ev = Other { core: EventCore::new(None) };
        assert_eq!(EventType::of_val(&ev), EventType::of::<Other>());
        assert!(EventType::of::<Other>().name().ends_with("Other"));
    }
}
