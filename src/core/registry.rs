//! # Subscription registry: who gets which event type.
//!
//! The registry owns the mapping from [`EventKey`] to the ordered list of
//! active subscriptions. Callers hold only an opaque [`SubscriptionId`];
//! internal records never leave this module.
//!
//! ## Rules
//! - One global critical section guards the whole map. Subscribe and
//!   unsubscribe are rare next to publish, so correctness is bought with a
//!   single lock rather than per-type granularity.
//! - The lock is never held while handlers run: dispatch works on a
//!   [`snapshot`](Registry::snapshot), a point-in-time copy of one type's
//!   list. Mutations after the snapshot do not affect an in-flight dispatch.
//! - Ids are issued from a per-bus counter and never reused, even after
//!   removal.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::events::EventKey;
use crate::subscribers::{Handle, HandleAsync};

/// Opaque identifier of a single subscription.
///
/// Issued by `subscribe`, presented back to `unsubscribe`. Unique for the
/// lifetime of the bus that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Registered handler, in one of the two supported flavors.
#[derive(Clone)]
pub(crate) enum HandlerKind {
    Sync(Arc<dyn Handle>),
    Async(Arc<dyn HandleAsync>),
}

impl HandlerKind {
    pub(crate) fn name(&self) -> &str {
        match self {
            HandlerKind::Sync(h) => h.name(),
            HandlerKind::Async(h) => h.name(),
        }
    }
}

/// Internal subscription record.
///
/// Lives in the registry; dispatch receives shallow clones (the handler is
/// behind an `Arc`).
#[derive(Clone)]
pub(crate) struct Subscription {
    pub(crate) id: SubscriptionId,
    pub(crate) key: EventKey,
    pub(crate) name: Arc<str>,
    pub(crate) handler: HandlerKind,
}

/// Mapping from event type key to its ordered subscriptions.
pub(crate) struct Registry {
    subs: Mutex<HashMap<EventKey, Vec<Subscription>>>,
    next_id: AtomicU64,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            subs: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Registers a handler for the given type; returns a fresh unique id.
    ///
    /// Entries keep insertion order per type; sequential dispatch delivers in
    /// this order.
    pub(crate) fn insert(&self, key: EventKey, handler: HandlerKind) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let name: Arc<str> = handler.name().into();
        let sub = Subscription {
            id,
            key: key.clone(),
            name,
            handler,
        };
        self.subs.lock().entry(key).or_default().push(sub);
        id
    }

    /// Removes the subscription with the given id, under whichever type it
    /// was registered. Returns whether a removal occurred; repeated calls for
    /// the same id return false.
    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subs.lock();
        let removed_from = subs.iter_mut().find_map(|(key, list)| {
            let pos = list.iter().position(|s| s.id == id)?;
            list.remove(pos);
            Some((key.clone(), list.is_empty()))
        });
        match removed_from {
            Some((key, now_empty)) => {
                if now_empty {
                    subs.remove(&key);
                }
                true
            }
            None => false,
        }
    }

    /// Removes all subscriptions for a type; returns how many were dropped.
    pub(crate) fn remove_all(&self, key: &EventKey) -> usize {
        self.subs.lock().remove(key).map_or(0, |list| list.len())
    }

    /// Point-in-time copy of one type's subscriptions, in registration order.
    ///
    /// The returned list is independent of the registry; mutations after this
    /// call do not affect it.
    pub(crate) fn snapshot(&self, key: &EventKey) -> Vec<Subscription> {
        self.subs.lock().get(key).cloned().unwrap_or_default()
    }

    /// Drops every subscription; returns how many were dropped.
    pub(crate) fn clear(&self) -> usize {
        let mut subs = self.subs.lock();
        let dropped = subs.values().map(Vec::len).sum();
        subs.clear();
        dropped
    }

    /// Number of distinct event types with at least one subscription.
    pub(crate) fn type_count(&self) -> usize {
        self.subs.lock().len()
    }

    /// Total number of active subscriptions across all types.
    pub(crate) fn subscription_count(&self) -> usize {
        self.subs.lock().values().map(Vec::len).sum()
    }

    /// Number of active subscriptions for one type.
    pub(crate) fn count_for(&self, key: &EventKey) -> usize {
        self.subs.lock().get(key).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;

    fn noop() -> HandlerKind {
        HandlerKind::Sync(Arc::new(|_: &Event| {}))
    }

    #[test]
    fn test_ids_are_unique_and_never_reused() {
        let reg = Registry::new();
        let a = reg.insert(EventKey::Notification, noop());
        let b = reg.insert(EventKey::Notification, noop());
        assert_ne!(a, b);

        assert!(reg.remove(a));
        let c = reg.insert(EventKey::Notification, noop());
        assert_ne!(c, a, "removed id must not be reissued");
        assert_ne!(c, b);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let reg = Registry::new();
        let id = reg.insert(EventKey::DataUpdated, noop());
        assert!(reg.remove(id));
        assert!(!reg.remove(id), "second removal must be a no-op");
    }

    #[test]
    fn test_remove_finds_id_under_any_key() {
        let reg = Registry::new();
        let _a = reg.insert(EventKey::Notification, noop());
        let b = reg.insert(EventKey::custom("screen.local"), noop());
        assert!(reg.remove(b));
        assert_eq!(reg.count_for(&EventKey::custom("screen.local")), 0);
        assert_eq!(reg.count_for(&EventKey::Notification), 1);
    }

    #[test]
    fn test_remove_all_returns_count() {
        let reg = Registry::new();
        for _ in 0..3 {
            reg.insert(EventKey::DataUpdated, noop());
        }
        reg.insert(EventKey::Notification, noop());

        assert_eq!(reg.remove_all(&EventKey::DataUpdated), 3);
        assert_eq!(reg.remove_all(&EventKey::DataUpdated), 0);
        assert_eq!(reg.subscription_count(), 1);
    }

    #[test]
    fn test_snapshot_is_detached_from_later_mutation() {
        let reg = Registry::new();
        reg.insert(EventKey::Notification, noop());
        let snap = reg.snapshot(&EventKey::Notification);
        assert_eq!(snap.len(), 1);

        reg.insert(EventKey::Notification, noop());
        assert_eq!(snap.len(), 1, "snapshot must not see later inserts");
        assert_eq!(reg.snapshot(&EventKey::Notification).len(), 2);
    }

    #[test]
    fn test_snapshot_preserves_registration_order() {
        let reg = Registry::new();
        let first = reg.insert(EventKey::Notification, noop());
        let second = reg.insert(EventKey::Notification, noop());
        let third = reg.insert(EventKey::Notification, noop());

        let order: Vec<SubscriptionId> = reg
            .snapshot(&EventKey::Notification)
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(order, vec![first, second, third]);
    }

    #[test]
    fn test_empty_type_lists_are_dropped() {
        let reg = Registry::new();
        let id = reg.insert(EventKey::Notification, noop());
        assert_eq!(reg.type_count(), 1);
        reg.remove(id);
        assert_eq!(reg.type_count(), 0, "empty list must not count as a type");
    }

    #[test]
    fn test_clear_reports_total() {
        let reg = Registry::new();
        reg.insert(EventKey::Notification, noop());
        reg.insert(EventKey::DataUpdated, noop());
        assert_eq!(reg.clear(), 2);
        assert_eq!(reg.subscription_count(), 0);
        assert_eq!(reg.type_count(), 0);
    }
}
