//! # Dispatch engine: guarded delivery in two modes.
//!
//! Given a registry snapshot and a shared event, this module invokes every
//! handler and reports which ones failed. Two delivery modes:
//!
//! - [`deliver_in_order`]: sequential, on the calling task, in registration
//!   order. Async handlers are awaited to completion before the next handler
//!   runs; there is no fire-and-forget.
//! - [`deliver_fanout`]: one worker task per handler, no ordering among them;
//!   resolves after all handlers finish or fail.
//!
//! ## Isolation
//! Every invocation is individually wrapped: a panicking handler is caught,
//! turned into a [`HandlerFailure`], and never affects sibling handlers or
//! the publisher. Sync handlers are wrapped in `catch_unwind`; async handler
//! futures in `FutureExt::catch_unwind`. Fan-out workers additionally surface
//! panics through the join error.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;

use crate::core::registry::{HandlerKind, Subscription};
use crate::error::HandlerFailure;
use crate::events::Event;

/// Result of one delivery pass over a snapshot.
pub(crate) struct DeliveryOutcome {
    /// How many handlers were invoked (failed ones included).
    pub(crate) invoked: usize,
    /// Failures observed, in no particular order for fan-out.
    pub(crate) failures: Vec<HandlerFailure>,
}

/// Sequential delivery: each handler runs to completion, in registration
/// order, on the calling task.
pub(crate) async fn deliver_in_order(
    subs: &[Subscription],
    event: &Arc<Event>,
) -> DeliveryOutcome {
    let mut failures = Vec::new();
    for sub in subs {
        if let Err(reason) = invoke(sub, event).await {
            failures.push(HandlerFailure::new(
                sub.id,
                Arc::clone(&sub.name),
                sub.key.clone(),
                reason,
            ));
        }
    }
    DeliveryOutcome {
        invoked: subs.len(),
        failures,
    }
}

/// Concurrent delivery: one worker per handler, joined before returning.
///
/// Sync handlers run their callback on the worker so a slow one cannot block
/// the publisher's task; async handlers run their body to completion there.
pub(crate) async fn deliver_fanout(
    subs: Vec<Subscription>,
    event: &Arc<Event>,
) -> DeliveryOutcome {
    let invoked = subs.len();
    let mut workers = Vec::with_capacity(invoked);
    for sub in subs {
        let ev = Arc::clone(event);
        let id = sub.id;
        let name = Arc::clone(&sub.name);
        let key = sub.key.clone();
        let join = tokio::spawn(async move { invoke(&sub, &ev).await });
        workers.push((id, name, key, join));
    }

    let mut failures = Vec::new();
    for (id, name, key, join) in workers {
        match join.await {
            Ok(Ok(())) => {}
            Ok(Err(reason)) => failures.push(HandlerFailure::new(id, name, key, reason)),
            // Unreachable while invoke() catches panics, kept as a backstop.
            Err(join_err) => {
                let reason: Arc<str> = if join_err.is_panic() {
                    "handler worker panicked".into()
                } else {
                    "handler worker cancelled".into()
                };
                failures.push(HandlerFailure::new(id, name, key, reason));
            }
        }
    }
    DeliveryOutcome { invoked, failures }
}

/// Invokes one handler with per-handler panic isolation.
async fn invoke(sub: &Subscription, event: &Event) -> Result<(), Arc<str>> {
    match &sub.handler {
        HandlerKind::Sync(handler) => {
            panic::catch_unwind(AssertUnwindSafe(|| handler.on_event(event)))
                .map_err(panic_reason)
        }
        HandlerKind::Async(handler) => AssertUnwindSafe(handler.on_event(event))
            .catch_unwind()
            .await
            .map_err(panic_reason),
    }
}

/// Best-effort extraction of a panic message.
fn panic_reason(panic: Box<dyn Any + Send>) -> Arc<str> {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).into()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str().into()
    } else {
        "handler panicked".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::{HandlerKind, Registry};
    use crate::events::{EventKey, Severity};
    use crate::subscribers::AsyncHandler;
    use parking_lot::Mutex;
    use std::time::Duration;

    fn snapshot_of(reg: &Registry, key: &EventKey) -> Vec<Subscription> {
        reg.snapshot(key)
    }

    fn notification() -> Arc<Event> {
        Arc::new(Event::notification("t", "m", Severity::Info))
    }

    #[tokio::test]
    async fn test_in_order_delivery_follows_registration_order() {
        let reg = Registry::new();
        let seen: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));
        for n in 0..4u32 {
            let seen = Arc::clone(&seen);
            reg.insert(
                EventKey::Notification,
                HandlerKind::Sync(Arc::new(move |_: &Event| seen.lock().push(n))),
            );
        }

        let subs = snapshot_of(&reg, &EventKey::Notification);
        let outcome = deliver_in_order(&subs, &notification()).await;

        assert_eq!(outcome.invoked, 4);
        assert!(outcome.failures.is_empty());
        assert_eq!(*seen.lock(), vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_panicking_handler_does_not_stop_later_ones() {
        let reg = Registry::new();
        let seen: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

        {
            let seen = Arc::clone(&seen);
            reg.insert(
                EventKey::Notification,
                HandlerKind::Sync(Arc::new(move |_: &Event| seen.lock().push("first"))),
            );
        }
        reg.insert(
            EventKey::Notification,
            HandlerKind::Sync(Arc::new(|_: &Event| panic!("boom"))),
        );
        {
            let seen = Arc::clone(&seen);
            reg.insert(
                EventKey::Notification,
                HandlerKind::Sync(Arc::new(move |_: &Event| seen.lock().push("third"))),
            );
        }

        let subs = snapshot_of(&reg, &EventKey::Notification);
        let outcome = deliver_in_order(&subs, &notification()).await;

        assert_eq!(outcome.invoked, 3);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].reason.as_ref(), "boom");
        assert_eq!(*seen.lock(), vec!["first", "third"]);
    }

    #[tokio::test]
    async fn test_async_handler_is_awaited_in_sequential_mode() {
        let reg = Registry::new();
        let seen: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

        {
            let seen = Arc::clone(&seen);
            reg.insert(
                EventKey::Notification,
                HandlerKind::Async(Arc::new(AsyncHandler::new(move |_: Event| {
                    let seen = Arc::clone(&seen);
                    async move {
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        seen.lock().push("async");
                    }
                }))),
            );
        }
        {
            let seen = Arc::clone(&seen);
            reg.insert(
                EventKey::Notification,
                HandlerKind::Sync(Arc::new(move |_: &Event| seen.lock().push("sync"))),
            );
        }

        let subs = snapshot_of(&reg, &EventKey::Notification);
        deliver_in_order(&subs, &notification()).await;

        assert_eq!(
            *seen.lock(),
            vec!["async", "sync"],
            "async handler must finish before the next handler starts"
        );
    }

    #[tokio::test]
    async fn test_fanout_survives_panicking_handler() {
        let reg = Registry::new();
        let delivered = Arc::new(Mutex::new(0usize));

        reg.insert(
            EventKey::DataUpdated,
            HandlerKind::Sync(Arc::new(|_: &Event| panic!("fanout boom"))),
        );
        for _ in 0..3 {
            let delivered = Arc::clone(&delivered);
            reg.insert(
                EventKey::DataUpdated,
                HandlerKind::Sync(Arc::new(move |_: &Event| *delivered.lock() += 1)),
            );
        }

        let subs = snapshot_of(&reg, &EventKey::DataUpdated);
        let event = Arc::new(Event::data_updated("task", crate::events::DataAction::Updated));
        let outcome = deliver_fanout(subs, &event).await;

        assert_eq!(outcome.invoked, 4);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(*delivered.lock(), 3, "siblings must still observe the event");
    }

    #[tokio::test]
    async fn test_fanout_joins_async_handlers() {
        let reg = Registry::new();
        let done = Arc::new(Mutex::new(false));

        {
            let done = Arc::clone(&done);
            reg.insert(
                EventKey::Notification,
                HandlerKind::Async(Arc::new(AsyncHandler::new(move |_: Event| {
                    let done = Arc::clone(&done);
                    async move {
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        *done.lock() = true;
                    }
                }))),
            );
        }

        let subs = snapshot_of(&reg, &EventKey::Notification);
        deliver_fanout(subs, &notification()).await;

        assert!(*done.lock(), "fan-out must resolve only after handlers finish");
    }

    #[tokio::test]
    async fn test_panic_reason_extraction() {
        let reg = Registry::new();
        reg.insert(
            EventKey::Notification,
            HandlerKind::Sync(Arc::new(|_: &Event| panic!("{}", String::from("formatted")))),
        );

        let subs = snapshot_of(&reg, &EventKey::Notification);
        let outcome = deliver_in_order(&subs, &notification()).await;
        assert_eq!(outcome.failures[0].reason.as_ref(), "formatted");
    }
}
