//! # EventBus: the publish/subscribe facade.
//!
//! The [`EventBus`] ties the registry, dispatch engine, and history ledger
//! together behind the surface the rest of the application sees. It is an
//! explicit object owned by whoever assembles the application (typically as
//! `Arc<EventBus>`), not ambient global state; teardown goes through
//! [`cleanup`](EventBus::cleanup).
//!
//! ## High-level architecture
//! ```text
//! Publishers (any thread/task):            Subscribers:
//!   screen A ──┐                             subscribe(key, handler) ──► Registry
//!   screen B ──┼── publish(Event) ──► EventBus
//!   monitor  ──┘          │
//!                         ├─ enabled? ──no──► drop (no record, no count)
//!                         ├─ History.push(record)          (seq, bounded ring)
//!                         ├─ Registry.snapshot(key)        (copy, lock released)
//!                         ├─ dispatch ── publish():        in order, on this task
//!                         │             publish_fanout():  one worker per handler, join
//!                         └─ failures ──► HandlerFailure diagnostic (non-recursive)
//! ```
//!
//! ## Failure contract
//! A misbehaving subscriber can never break an unrelated producer: handler
//! panics are isolated per handler, logged, surfaced as a synthetic
//! [`Payload::HandlerFailure`](crate::Payload::HandlerFailure) event, and
//! swallowed. `publish` has no error path.
//!
//! ## Reentrancy
//! No internal lock is held while a handler runs, so handlers may freely
//! subscribe, unsubscribe, or publish on the same bus. A subscription changed
//! during a dispatch takes effect for the next publish; the in-flight
//! snapshot is not affected.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::core::builder::BusBuilder;
use crate::core::config::BusConfig;
use crate::core::dispatch::{self, DeliveryOutcome};
use crate::core::history::History;
use crate::core::registry::{HandlerKind, Registry, SubscriptionId};
use crate::core::stats::{self, BusStats};
use crate::error::HandlerFailure;
use crate::events::{DataAction, Event, EventKey, EventRecord, Severity};
use crate::subscribers::{Handle, HandleAsync};

/// In-process typed publish/subscribe bus with bounded history.
pub struct EventBus {
    enabled: AtomicBool,
    registry: Registry,
    history: History,
}

impl EventBus {
    /// Creates a bus with the given configuration.
    #[must_use]
    pub fn new(config: BusConfig) -> Self {
        Self {
            enabled: AtomicBool::new(config.start_enabled),
            registry: Registry::new(),
            history: History::new(
                config.history_capacity_clamped(),
                config.recent_limit_clamped(),
            ),
        }
    }

    /// Starts a builder for a bus with pre-seeded subscriptions.
    #[must_use]
    pub fn builder(config: BusConfig) -> BusBuilder {
        BusBuilder::new(config)
    }

    // ---- Subscriptions ----

    /// Registers a synchronous handler for the given event type.
    ///
    /// Returns an opaque id to present to [`unsubscribe`](EventBus::unsubscribe).
    /// Always succeeds; there is no bound on subscriptions per type.
    pub fn subscribe<H: Handle>(&self, key: EventKey, handler: H) -> SubscriptionId {
        self.register(key, HandlerKind::Sync(Arc::new(handler)))
    }

    /// Registers an asynchronous handler for the given event type.
    ///
    /// The handler's body runs to completion in both publish modes before the
    /// publish resolves; see the dispatch notes on `publish` ordering.
    pub fn subscribe_async<H: HandleAsync>(&self, key: EventKey, handler: H) -> SubscriptionId {
        self.register(key, HandlerKind::Async(Arc::new(handler)))
    }

    pub(crate) fn register(&self, key: EventKey, handler: HandlerKind) -> SubscriptionId {
        let id = self.registry.insert(key.clone(), handler);
        debug!(%id, key = %key, "subscription added");
        id
    }

    /// Removes the subscription with the given id, under whichever type it
    /// was registered.
    ///
    /// Returns whether a removal occurred. Removing an already-removed id is
    /// a normal race during concurrent teardown, not an error: it returns
    /// `false`.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.registry.remove(id);
        if removed {
            debug!(%id, "subscription removed");
        }
        removed
    }

    /// Removes all subscriptions for one event type; returns how many were
    /// dropped. Used for teardown of a whole feature area.
    pub fn unsubscribe_all(&self, key: &EventKey) -> usize {
        let dropped = self.registry.remove_all(key);
        if dropped > 0 {
            debug!(key = %key, dropped, "subscriptions removed");
        }
        dropped
    }

    /// Number of active subscriptions for one event type.
    #[must_use]
    pub fn subscription_count(&self, key: &EventKey) -> usize {
        self.registry.count_for(key)
    }

    // ---- Publishing ----

    /// Publishes an event sequentially.
    ///
    /// Handlers run one after another, in registration order, on the calling
    /// task; async handlers are awaited to completion before the next handler
    /// starts. Returns the number of handlers invoked (zero subscribers is
    /// not a failure; the event is still recorded).
    ///
    /// Never returns an error: handler failures are isolated, logged, and
    /// surfaced as `HandlerFailure` diagnostic events.
    pub async fn publish(&self, event: Event) -> usize {
        let Some(event) = self.admit(event) else {
            return 0;
        };
        let subs = self.registry.snapshot(&event.key());
        if subs.is_empty() {
            return 0;
        }
        let outcome = dispatch::deliver_in_order(&subs, &event).await;
        self.report_failures(&outcome).await;
        outcome.invoked
    }

    /// Publishes an event with concurrent fan-out.
    ///
    /// One worker per handler; sync handlers run their callback on the worker
    /// so a slow one cannot block this task. No ordering among handlers; the
    /// call resolves once all have finished or failed. Failures are
    /// aggregated and reported the same way as in sequential mode.
    pub async fn publish_fanout(&self, event: Event) -> usize {
        let Some(event) = self.admit(event) else {
            return 0;
        };
        let subs = self.registry.snapshot(&event.key());
        if subs.is_empty() {
            return 0;
        }
        let outcome = dispatch::deliver_fanout(subs, &event).await;
        self.report_failures(&outcome).await;
        outcome.invoked
    }

    /// Enabled gate plus history/counter update, shared by both publish modes.
    ///
    /// Publishes serialize at the ledger append: sequence order equals ledger
    /// order even with concurrent publishers.
    fn admit(&self, event: Event) -> Option<Arc<Event>> {
        if !self.is_enabled() {
            warn!(key = %event.key(), "bus disabled, event discarded");
            return None;
        }
        let event = Arc::new(event);
        let seq = self.history.push(&event);
        debug!(seq, key = %event.key(), "event published");
        Some(event)
    }

    /// Publishes the synthetic diagnostic for each failure, bypassing normal
    /// re-entrant dispatch: a failure inside a `HandlerFailure` subscriber is
    /// logged and dropped, never re-dispatched, so failure handling cannot
    /// recurse.
    async fn report_failures(&self, outcome: &DeliveryOutcome) {
        for failure in &outcome.failures {
            error!(
                id = %failure.id,
                handler = %failure.handler,
                key = %failure.key,
                reason = %failure.reason,
                "handler failed during dispatch"
            );
            self.publish_diagnostic(failure).await;
        }
    }

    async fn publish_diagnostic(&self, failure: &HandlerFailure) {
        let event = Arc::new(Event::handler_failure(failure));
        self.history.push(&event);

        let subs = self.registry.snapshot(&EventKey::HandlerFailure);
        if subs.is_empty() {
            return;
        }
        let outcome = dispatch::deliver_in_order(&subs, &event).await;
        for nested in outcome.failures {
            error!(
                handler = %nested.handler,
                reason = %nested.reason,
                "failure handler itself failed; not re-dispatched"
            );
        }
    }

    // ---- Convenience wrappers for well-known application events ----

    /// Publishes a user-selected event.
    pub async fn publish_user_selected(
        &self,
        user_id: impl Into<Arc<str>>,
        display_name: impl Into<Arc<str>>,
    ) -> usize {
        self.publish(Event::user_selected(user_id, display_name)).await
    }

    /// Publishes a project-selected event.
    pub async fn publish_project_selected(
        &self,
        project_id: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
    ) -> usize {
        self.publish(Event::project_selected(project_id, name)).await
    }

    /// Publishes a notification event.
    pub async fn notify(
        &self,
        title: impl Into<Arc<str>>,
        message: impl Into<Arc<str>>,
        severity: Severity,
    ) -> usize {
        self.publish(Event::notification(title, message, severity)).await
    }

    /// Publishes a data-updated event.
    pub async fn publish_data_updated(
        &self,
        entity: impl Into<Arc<str>>,
        action: DataAction,
    ) -> usize {
        self.publish(Event::data_updated(entity, action)).await
    }

    /// Publishes a performance-alert event.
    pub async fn publish_performance_alert(
        &self,
        operation: impl Into<Arc<str>>,
        elapsed: Duration,
    ) -> usize {
        self.publish(Event::performance_alert(operation, elapsed)).await
    }

    // ---- Control & introspection ----

    /// Toggles whether publishes are accepted.
    ///
    /// Effective for publishes issued after the toggle; an in-flight dispatch
    /// is not interrupted. Both states accept subscribe/unsubscribe.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
        debug!(enabled, "bus toggled");
    }

    /// Whether the bus currently accepts publishes.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Point-in-time statistics snapshot.
    #[must_use]
    pub fn stats(&self) -> BusStats {
        stats::snapshot(self.is_enabled(), &self.registry, &self.history)
    }

    /// Up to `count` most recent history records, oldest first among the
    /// returned subset. `count` is clamped to the configured per-query cap.
    #[must_use]
    pub fn history(&self, count: usize) -> Vec<EventRecord> {
        self.history.recent(count)
    }

    /// Tears the bus down: disables it, then clears all subscriptions and
    /// history. The publish counter is left intact (it is monotonic for the
    /// bus lifetime). Intended for application shutdown.
    pub fn cleanup(&self) {
        self.set_enabled(false);
        let dropped = self.registry.clear();
        self.history.clear();
        debug!(dropped, "bus cleaned up");
    }
}

impl Default for EventBus {
    /// A bus with [`BusConfig::default`] settings.
    fn default() -> Self {
        Self::new(BusConfig::default())
    }
}
