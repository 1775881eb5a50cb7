//! # Application events published through the bus.
//!
//! The [`EventKey`] enum is the routing identity: subscribers register against
//! a key, publishers produce payloads whose key matches. Routing is
//! reflection-free; the key is an explicit tagged value, never a runtime type
//! lookup.
//!
//! The [`Payload`] enum carries the well-known application events (selection
//! changes, notifications, data refreshes, performance alerts) plus two
//! special cases:
//! - `HandlerFailure`: synthetic diagnostic emitted by the bus itself when a
//!   subscriber fails;
//! - `Custom`: an open extension point for screen-local event types, keyed by
//!   a caller-chosen string.
//!
//! [`Payload::key`] derives the routing key from the variant, so a payload can
//! never be published under the wrong key.
//!
//! ## Example
//! ```rust
//! use signalbus::{Event, EventKey, Severity};
//!
//! let ev = Event::notification("Sync complete", "42 tasks refreshed", Severity::Success)
//!     .with_source("sync-screen");
//!
//! assert_eq!(ev.key(), EventKey::Notification);
//! assert_eq!(ev.source.as_deref(), Some("sync-screen"));
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::error::{BusError, HandlerFailure};

/// Routing identity of an event type.
///
/// Well-known application events get a dedicated variant; everything else
/// routes through [`EventKey::Custom`] with a caller-chosen string key.
/// Equality and hashing on `Custom` compare the string contents, so two
/// independently built keys with the same string route to the same
/// subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKey {
    /// A user was selected in some screen.
    UserSelected,
    /// A project was selected in some screen.
    ProjectSelected,
    /// A user-facing notification.
    Notification,
    /// A domain entity changed and dependent screens should refresh.
    DataUpdated,
    /// An operation exceeded its expected duration.
    PerformanceAlert,
    /// Synthetic diagnostic: a subscriber failed during dispatch.
    HandlerFailure,
    /// Screen-local event type with a caller-chosen key.
    Custom(Arc<str>),
}

impl EventKey {
    /// Builds a custom key without validation.
    ///
    /// Validation happens at [`Event::custom`], which rejects empty keys
    /// before anything reaches the bus.
    #[inline]
    pub fn custom(key: impl Into<Arc<str>>) -> Self {
        EventKey::Custom(key.into())
    }

    /// Returns a short stable label for use in logs/metrics.
    pub fn as_label(&self) -> &str {
        match self {
            EventKey::UserSelected => "user-selected",
            EventKey::ProjectSelected => "project-selected",
            EventKey::Notification => "notification",
            EventKey::DataUpdated => "data-updated",
            EventKey::PerformanceAlert => "performance-alert",
            EventKey::HandlerFailure => "handler-failure",
            EventKey::Custom(key) => key,
        }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Severity of a [`Payload::Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// What happened to the entity in a [`Payload::DataUpdated`] event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataAction {
    Created,
    Updated,
    Deleted,
    Refreshed,
}

/// Typed event payload.
///
/// Immutable once constructed; handlers receive `&Event` and share one
/// allocation with the history ledger, so text fields are `Arc<str>` and
/// clones are cheap.
#[derive(Debug, Clone)]
pub enum Payload {
    /// A user was selected.
    UserSelected {
        /// Identifier of the selected user.
        user_id: Arc<str>,
        /// Display name for screens that render the selection directly.
        display_name: Arc<str>,
    },
    /// A project was selected.
    ProjectSelected {
        /// Identifier of the selected project.
        project_id: Arc<str>,
        /// Project name for screens that render the selection directly.
        name: Arc<str>,
    },
    /// A user-facing notification.
    Notification {
        title: Arc<str>,
        message: Arc<str>,
        severity: Severity,
    },
    /// A domain entity changed.
    DataUpdated {
        /// Entity kind, e.g. `"task"` or `"project"`.
        entity: Arc<str>,
        action: DataAction,
    },
    /// An operation exceeded its expected duration.
    PerformanceAlert {
        /// Name of the slow operation.
        operation: Arc<str>,
        /// Observed duration in milliseconds.
        elapsed_ms: u64,
    },
    /// Synthetic diagnostic emitted by the bus when a subscriber fails.
    ///
    /// Published through a non-recursive path: failures of `HandlerFailure`
    /// subscribers themselves are logged but never re-dispatched.
    HandlerFailure {
        /// Event type the failed delivery was for.
        key: EventKey,
        /// Name of the failed handler.
        handler: Arc<str>,
        /// Best-effort panic message.
        reason: Arc<str>,
    },
    /// Screen-local event type with free-form data.
    Custom {
        /// Routing key (non-empty, enforced by [`Event::custom`]).
        key: Arc<str>,
        /// Free-form payload data.
        data: serde_json::Value,
    },
}

impl Payload {
    /// Derives the routing key from the payload variant.
    pub fn key(&self) -> EventKey {
        match self {
            Payload::UserSelected { .. } => EventKey::UserSelected,
            Payload::ProjectSelected { .. } => EventKey::ProjectSelected,
            Payload::Notification { .. } => EventKey::Notification,
            Payload::DataUpdated { .. } => EventKey::DataUpdated,
            Payload::PerformanceAlert { .. } => EventKey::PerformanceAlert,
            Payload::HandlerFailure { .. } => EventKey::HandlerFailure,
            Payload::Custom { key, .. } => EventKey::Custom(Arc::clone(key)),
        }
    }
}

/// Event envelope: payload plus publish-time metadata.
///
/// - `at`: wall-clock timestamp taken at construction
/// - `source`: best-effort label of the publishing component (for diagnostics)
/// - `payload`: the typed event value; handlers must not mutate it (they only
///   ever see `&Event`)
#[derive(Debug, Clone)]
pub struct Event {
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Best-effort label of the publishing component.
    pub source: Option<Arc<str>>,
    /// Typed event value.
    pub payload: Payload,
}

impl Event {
    /// Creates a new event with the current timestamp and no source label.
    pub fn new(payload: Payload) -> Self {
        Self {
            at: SystemTime::now(),
            source: None,
            payload,
        }
    }

    /// Attaches a source label (publishing screen/component name).
    #[inline]
    pub fn with_source(mut self, source: impl Into<Arc<str>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Routing key of this event.
    #[inline]
    pub fn key(&self) -> EventKey {
        self.payload.key()
    }

    /// Creates a user-selected event.
    #[inline]
    pub fn user_selected(
        user_id: impl Into<Arc<str>>,
        display_name: impl Into<Arc<str>>,
    ) -> Self {
        Event::new(Payload::UserSelected {
            user_id: user_id.into(),
            display_name: display_name.into(),
        })
    }

    /// Creates a project-selected event.
    #[inline]
    pub fn project_selected(project_id: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        Event::new(Payload::ProjectSelected {
            project_id: project_id.into(),
            name: name.into(),
        })
    }

    /// Creates a notification event.
    #[inline]
    pub fn notification(
        title: impl Into<Arc<str>>,
        message: impl Into<Arc<str>>,
        severity: Severity,
    ) -> Self {
        Event::new(Payload::Notification {
            title: title.into(),
            message: message.into(),
            severity,
        })
    }

    /// Creates a data-updated event.
    #[inline]
    pub fn data_updated(entity: impl Into<Arc<str>>, action: DataAction) -> Self {
        Event::new(Payload::DataUpdated {
            entity: entity.into(),
            action,
        })
    }

    /// Creates a performance-alert event.
    ///
    /// The duration is stored as milliseconds, saturating at `u64::MAX`.
    #[inline]
    pub fn performance_alert(operation: impl Into<Arc<str>>, elapsed: Duration) -> Self {
        let elapsed_ms = elapsed.as_millis().min(u128::from(u64::MAX)) as u64;
        Event::new(Payload::PerformanceAlert {
            operation: operation.into(),
            elapsed_ms,
        })
    }

    /// Creates a custom event with a caller-chosen key.
    ///
    /// # Errors
    /// Returns [`BusError::EmptyEventKey`] if `key` is empty. Rejected here,
    /// synchronously, so an unroutable event can never reach the bus.
    pub fn custom(key: impl Into<Arc<str>>, data: serde_json::Value) -> Result<Self, BusError> {
        let key = key.into();
        if key.is_empty() {
            return Err(BusError::EmptyEventKey);
        }
        Ok(Event::new(Payload::Custom { key, data }))
    }

    /// Creates the synthetic diagnostic event for a handler failure.
    pub(crate) fn handler_failure(failure: &HandlerFailure) -> Self {
        Event::new(Payload::HandlerFailure {
            key: failure.key.clone(),
            handler: Arc::clone(&failure.handler),
            reason: Arc::clone(&failure.reason),
        })
        .with_source("bus")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_key_matches_variant() {
        let cases = [
            (Event::user_selected("u1", "Ada").key(), EventKey::UserSelected),
            (
                Event::project_selected("p1", "Apollo").key(),
                EventKey::ProjectSelected,
            ),
            (
                Event::notification("t", "m", Severity::Info).key(),
                EventKey::Notification,
            ),
            (
                Event::data_updated("task", DataAction::Created).key(),
                EventKey::DataUpdated,
            ),
            (
                Event::performance_alert("load", Duration::from_millis(7)).key(),
                EventKey::PerformanceAlert,
            ),
        ];
        for (got, want) in cases {
            assert_eq!(got, want);
        }
    }

    #[test]
    fn test_custom_keys_compare_by_contents() {
        let a = EventKey::custom("task-board.filter-changed");
        let b = EventKey::custom(String::from("task-board.filter-changed"));
        assert_eq!(a, b);
        assert_ne!(a, EventKey::custom("task-board.sort-changed"));
    }

    #[test]
    fn test_custom_event_carries_its_key() {
        let ev = Event::custom(
            "task-board.filter-changed",
            serde_json::json!({"tag": "urgent"}),
        )
        .expect("non-empty key");
        assert_eq!(ev.key(), EventKey::custom("task-board.filter-changed"));
    }

    #[test]
    fn test_empty_custom_key_rejected() {
        let err = Event::custom("", serde_json::Value::Null).unwrap_err();
        assert_eq!(err.as_label(), "bus_empty_event_key");
    }

    #[test]
    fn test_performance_alert_saturates_millis() {
        let ev = Event::performance_alert("load", Duration::MAX);
        match ev.payload {
            Payload::PerformanceAlert { elapsed_ms, .. } => assert_eq!(elapsed_ms, u64::MAX),
            other => panic!("unexpected payload: {other:?}"),
        }
    }
}
