//! Error types used by the bus.
//!
//! This module defines two things:
//!
//! - [`BusError`] - synchronous configuration errors, rejected at the call site
//!   before anything is registered or recorded.
//! - [`HandlerFailure`] - a per-handler delivery failure record. Handler
//!   failures are **not** errors from the caller's point of view: `publish`
//!   never propagates them. They surface only through the diagnostic channel
//!   (a `HandlerFailure` event) and the log.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::core::SubscriptionId;
use crate::events::EventKey;

/// # Errors produced by bus configuration.
///
/// These are the only errors the bus ever returns to a caller. Delivery
/// failures are isolated per handler and never escape `publish`.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BusError {
    /// A custom event was constructed with an empty type key.
    ///
    /// Routing is keyed by the event type, so an empty key would create an
    /// unreachable event type. Rejected before anything is recorded.
    #[error("custom event key must not be empty")]
    EmptyEventKey,
}

impl BusError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use signalbus::BusError;
    ///
    /// let err = BusError::EmptyEventKey;
    /// assert_eq!(err.as_label(), "bus_empty_event_key");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::EmptyEventKey => "bus_empty_event_key",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            BusError::EmptyEventKey => "custom event key must not be empty".to_string(),
        }
    }
}

/// A single handler failure observed during dispatch.
///
/// Created by the dispatch engine when a handler panics. Carried into the
/// synthetic `HandlerFailure` diagnostic event and the failure log; never
/// returned to the publisher.
#[derive(Debug, Clone)]
pub struct HandlerFailure {
    /// Subscription whose handler failed.
    pub id: SubscriptionId,
    /// Handler name (as declared at registration).
    pub handler: Arc<str>,
    /// Event type the failed delivery was for.
    pub key: EventKey,
    /// Best-effort panic message.
    pub reason: Arc<str>,
}

impl HandlerFailure {
    pub(crate) fn new(
        id: SubscriptionId,
        handler: Arc<str>,
        key: EventKey,
        reason: Arc<str>,
    ) -> Self {
        Self {
            id,
            handler,
            key,
            reason,
        }
    }
}

impl fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "handler '{}' (subscription {}) failed on '{}': {}",
            self.handler, self.id, self.key, self.reason
        )
    }
}
