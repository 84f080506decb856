//! # Handler registry - priority-ordered registrations per event type.
//!
//! Registrations are grouped by exact [`EventType`]. Each group is a list
//! sorted by `(priority, registration order)`: lower priority runs first,
//! ties run in the order they were added.
//!
//! ## Architecture
//! ```text
//! RwLock<Inner>
//!   ├─► by_type:  EventType ──► Arc<Vec<Arc<Registration>>>   (sorted)
//!   └─► index:    RegistrationId ──► EventType                (for removal)
//!
//! snapshot(type) ── read lock ──► Arc clone of the list ──► lock released
//! add/remove     ── write lock ──► Arc::make_mut (copies only if a snapshot is alive)
//! ```
//!
//! ## Rules
//! - Dispatch iterates a snapshot; no lock is held while handlers run.
//! - Additions are not visible to dispatches already iterating.
//! - Removal deactivates the registration, so an in-flight snapshot skips it.
//! - Removing an unknown id is a no-op.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::events::EventType;
use crate::handlers::HandlerRef;

/// Handle returned by handler registration; pass it back to remove the handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(u64);

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reg-{}", self.0)
    }
}

/// One registered handler.
pub(crate) struct Registration {
    pub(crate) id: RegistrationId,
    pub(crate) priority: i32,
    pub(crate) handler: HandlerRef,
    active: AtomicBool,
}

impl Registration {
    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

type Chain = Arc<Vec<Arc<Registration>>>;

#[derive(Default)]
struct Inner {
    by_type: HashMap<EventType, Chain>,
    index: HashMap<RegistrationId, EventType>,
}

/// Registry of handlers keyed by exact event type.
#[derive(Default)]
pub(crate) struct HandlerRegistry {
    inner: RwLock<Inner>,
    next_id: AtomicU64,
}

impl HandlerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a handler after every existing registration with priority `<= priority`.
    pub(crate) fn add(
        &self,
        priority: i32,
        event_type: EventType,
        handler: HandlerRef,
    ) -> RegistrationId {
        let id = RegistrationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let reg = Arc::new(Registration {
            id,
            priority,
            handler,
            active: AtomicBool::new(true),
        });

        let mut inner = self.inner.write();
        let chain = Arc::make_mut(inner.by_type.entry(event_type).or_default());
        let at = chain.partition_point(|r| r.priority <= priority);
        chain.insert(at, reg);
        inner.index.insert(id, event_type);
        id
    }

    /// Removes a registration. Returns `false` if `id` is unknown.
    pub(crate) fn remove(&self, id: RegistrationId) -> bool {
        let mut inner = self.inner.write();
        let Some(event_type) = inner.index.remove(&id) else {
            return false;
        };

        let mut now_empty = false;
        if let Some(chain) = inner.by_type.get_mut(&event_type) {
            let chain = Arc::make_mut(chain);
            if let Some(pos) = chain.iter().position(|r| r.id == id) {
                let reg = chain.remove(pos);
                reg.active.store(false, Ordering::Release);
            }
            now_empty = chain.is_empty();
        }
        if now_empty {
            inner.by_type.remove(&event_type);
        }
        true
    }

    /// Ordered registrations for `event_type` at this instant.
    pub(crate) fn snapshot(&self, event_type: &EventType) -> Option<Chain> {
        self.inner.read().by_type.get(event_type).cloned()
    }

    pub(crate) fn count(&self, event_type: &EventType) -> usize {
        self.inner
            .read()
            .by_type
            .get(event_type)
            .map_or(0, |chain| chain.len())
    }

    pub(crate) fn contains(&self, id: RegistrationId) -> bool {
        self.inner.read().index.contains_key(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.read().index.len()
    }
}
