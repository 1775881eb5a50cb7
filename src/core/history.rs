//! # History ledger: bounded FIFO of recent traffic.
//!
//! Every effective publish appends one [`EventRecord`] here before any
//! handler runs. The ledger is a ring with a fixed capacity; once full, the
//! oldest record is evicted synchronously at enqueue time, so length never
//! exceeds capacity and memory stays bounded under sustained load.
//!
//! The ledger also owns the monotonic publish counter. The sequence number is
//! assigned under the same lock as the append, so ledger order equals
//! sequence order even with concurrent publishers. The counter only grows:
//! eviction and [`clear`](History::clear) leave it untouched.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::events::{Event, EventRecord};

/// Bounded, thread-safe FIFO of the most recent published events.
pub(crate) struct History {
    entries: Mutex<VecDeque<EventRecord>>,
    capacity: usize,
    recent_limit: usize,
    total: AtomicU64,
}

impl History {
    /// Creates a ledger with the given capacity and per-query result cap.
    ///
    /// Both are expected pre-clamped (min 1) by `BusConfig`.
    pub(crate) fn new(capacity: usize, recent_limit: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
            recent_limit,
            total: AtomicU64::new(0),
        }
    }

    /// Appends a record for the event and returns its sequence number.
    ///
    /// Evicts from the front until at capacity. O(1) amortized.
    pub(crate) fn push(&self, event: &Arc<Event>) -> u64 {
        let mut entries = self.entries.lock();
        let seq = self.total.fetch_add(1, Ordering::Relaxed) + 1;
        entries.push_back(EventRecord::new(seq, event));
        while entries.len() > self.capacity {
            entries.pop_front();
        }
        seq
    }

    /// Up to `count` most recent records, oldest first among the returned
    /// subset. `count` is clamped to the configured per-query cap.
    pub(crate) fn recent(&self, count: usize) -> Vec<EventRecord> {
        let entries = self.entries.lock();
        let take = count.min(self.recent_limit).min(entries.len());
        entries.iter().skip(entries.len() - take).cloned().collect()
    }

    /// Current ledger length.
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Total events ever recorded. Monotonic; not affected by eviction or
    /// [`clear`](History::clear).
    pub(crate) fn total_published(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Empties the ledger. The publish counter is left as is.
    pub(crate) fn clear(&self) {
        self.entries.lock().clear();
    }
}
