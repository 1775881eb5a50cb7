//! # Bus statistics: derived, point-in-time snapshot.
//!
//! [`BusStats`] is recomputed on demand from the registry and the history
//! ledger; nothing is stored beyond what those components already hold. The
//! snapshot reads one component at a time and never nests their locks, so the
//! read side cannot participate in a cross-component deadlock.

use crate::core::history::History;
use crate::core::registry::Registry;

/// Point-in-time view of bus activity.
///
/// Fields are sampled one after another, not atomically as a set: under
/// concurrent traffic, `history_len` may already include a publish that
/// `total_published` was read before. Each individual field is exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusStats {
    /// Total events ever published (monotonic, survives history eviction).
    pub total_published: u64,
    /// Distinct event types with at least one active subscription.
    pub event_types: usize,
    /// Total active subscriptions across all types.
    pub subscriptions: usize,
    /// Current history ledger length.
    pub history_len: usize,
    /// Whether the bus currently accepts publishes.
    pub enabled: bool,
}

pub(crate) fn snapshot(enabled: bool, registry: &Registry, history: &History) -> BusStats {
    BusStats {
        total_published: history.total_published(),
        event_types: registry.type_count(),
        subscriptions: registry.subscription_count(),
        history_len: history.len(),
        enabled,
    }
}
