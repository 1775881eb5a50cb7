//! # Handler contracts
//!
//! A subscription pairs an event type key with one of two handler flavors:
//!
//! - [`Handle`]: a plain synchronous callback. In sequential publish it runs
//!   on the calling task; in fan-out publish it runs on a worker so a slow
//!   handler cannot block the publisher.
//! - [`HandleAsync`]: an asynchronous callback. Its body is driven to
//!   completion before the handler counts as finished, in both publish modes.
//!
//! ## Contract
//! - Handlers receive `&Event` and must not assume exclusive access; the same
//!   event is shared with the history ledger and sibling handlers.
//! - Panics are caught by the dispatch engine and isolated per handler; a
//!   failing handler never affects siblings or the publisher.
//!
//! ## Example (skeleton)
//! ```rust
//! use signalbus::{Event, HandleAsync};
//! use async_trait::async_trait;
//!
//! struct AuditTrail;
//!
//! #[async_trait]
//! impl HandleAsync for AuditTrail {
//!     async fn on_event(&self, event: &Event) {
//!         // write audit record...
//!         let _ = event;
//!     }
//!     fn name(&self) -> &str {
//!         "audit-trail"
//!     }
//! }
//! ```

use std::future::Future;

use async_trait::async_trait;

use crate::events::Event;

/// Synchronous event handler.
///
/// Any `Fn(&Event) + Send + Sync + 'static` closure implements this trait, so
/// plain closures can be passed to `EventBus::subscribe` directly.
pub trait Handle: Send + Sync + 'static {
    /// Handles a single event.
    fn on_event(&self, event: &Event);

    /// Human-readable name (for logs and the failure diagnostic).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> Handle for F
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    fn on_event(&self, event: &Event) {
        self(event)
    }
}

/// Asynchronous event handler.
///
/// Driven to completion before the dispatch that invoked it resolves: the
/// sequential publish path awaits it inline, the fan-out path awaits it on a
/// worker. There is no fire-and-forget mode.
#[async_trait]
pub trait HandleAsync: Send + Sync + 'static {
    /// Handles a single event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs and the failure diagnostic).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Adapter turning an async closure into a [`HandleAsync`].
///
/// The closure receives an owned clone of the event (clones are cheap; text
/// fields are `Arc<str>`), which keeps the returned future `'static`.
///
/// ## Example
/// ```rust
/// use signalbus::{AsyncHandler, Event};
///
/// let handler = AsyncHandler::named("refresh", |ev: Event| async move {
///     let _ = ev;
///     // await some refresh call...
/// });
/// # let _ = handler;
/// ```
pub struct AsyncHandler<F> {
    name: &'static str,
    f: F,
}

impl<F> AsyncHandler<F> {
    /// Wraps an async closure under the default name.
    pub fn new(f: F) -> Self {
        Self {
            name: "async_handler",
            f,
        }
    }

    /// Wraps an async closure under an explicit name.
    pub fn named(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

#[async_trait]
impl<F, Fut> HandleAsync for AsyncHandler<F>
where
    F: Fn(Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send,
{
    async fn on_event(&self, event: &Event) {
        (self.f)(event.clone()).await;
    }

    fn name(&self) -> &str {
        self.name
    }
}
