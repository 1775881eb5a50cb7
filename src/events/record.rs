//! History entries kept by the bus ledger.

use std::sync::Arc;
use std::time::SystemTime;

use super::event::{Event, EventKey};

/// One entry in the bounded history ledger.
///
/// Created at publish time, immutable thereafter, evicted oldest-first when
/// the ledger is over capacity. The payload is shared with any still-running
/// handlers through the same `Arc`, never copied.
#[derive(Debug, Clone)]
pub struct EventRecord {
    /// Publish sequence number (1-based, monotonic, survives eviction).
    pub seq: u64,
    /// Routing key of the recorded event.
    pub key: EventKey,
    /// Wall-clock timestamp the event was constructed at.
    pub at: SystemTime,
    /// Best-effort label of the publishing component.
    pub source: Option<Arc<str>>,
    /// Shared reference to the published event.
    pub event: Arc<Event>,
}

impl EventRecord {
    pub(crate) fn new(seq: u64, event: &Arc<Event>) -> Self {
        Self {
            seq,
            key: event.key(),
            at: event.at,
            source: event.source.clone(),
            event: Arc::clone(event),
        }
    }
}
