//! # TraceWriter: log every event through `tracing`
//!
//! A minimal subscriber that writes each incoming [`Event`] to the active
//! `tracing` subscriber. Use it for demos, tests, or as a reference for
//! writing real observers.
//!
//! Subscribe it to each key you want traced:
//! ```rust
//! use signalbus::{EventBus, EventKey, TraceWriter};
//!
//! let bus = EventBus::default();
//! bus.subscribe(EventKey::Notification, TraceWriter::new());
//! bus.subscribe(EventKey::HandlerFailure, TraceWriter::new());
//! ```

use tracing::{error, info, warn};

use crate::events::{Event, Payload, Severity};

use super::Handle;

/// Event writer subscriber.
#[derive(Default)]
pub struct TraceWriter;

impl TraceWriter {
    /// Construct a new [`TraceWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Handle for TraceWriter {
    fn on_event(&self, event: &Event) {
        let source = event.source.as_deref().unwrap_or("unknown");
        match &event.payload {
            Payload::UserSelected {
                user_id,
                display_name,
            } => {
                info!(%user_id, %display_name, source, "user selected");
            }
            Payload::ProjectSelected { project_id, name } => {
                info!(%project_id, %name, source, "project selected");
            }
            Payload::Notification {
                title,
                message,
                severity,
            } => match severity {
                Severity::Warning => warn!(%title, %message, source, "notification"),
                Severity::Error => error!(%title, %message, source, "notification"),
                _ => info!(%title, %message, source, "notification"),
            },
            Payload::DataUpdated { entity, action } => {
                info!(%entity, ?action, source, "data updated");
            }
            Payload::PerformanceAlert {
                operation,
                elapsed_ms,
            } => {
                warn!(%operation, elapsed_ms, source, "performance alert");
            }
            Payload::HandlerFailure {
                key,
                handler,
                reason,
            } => {
                error!(%key, %handler, %reason, "handler failure");
            }
            Payload::Custom { key, data } => {
                info!(%key, %data, source, "custom event");
            }
        }
    }

    fn name(&self) -> &str {
        "TraceWriter"
    }
}
