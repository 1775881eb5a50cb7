//! # signalbus
//!
//! **signalbus** is an in-process typed publish/subscribe bus for desktop
//! applications whose screens and background components must communicate
//! without referencing each other directly.
//!
//! It provides typed event routing, isolated handler execution, two delivery
//! modes (sequential and concurrent fan-out), and a bounded, inspectable
//! history of recent traffic.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   screen A   │   │   screen B   │   │  background  │
//!     │ (publisher)  │   │ (subscriber) │   │   monitor    │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventBus                                                         │
//! │  - Registry   (event key ──► ordered subscriptions)               │
//! │  - Dispatch   (snapshot, guarded invoke, sequential / fan-out)    │
//! │  - History    (bounded ring of EventRecords + publish counter)    │
//! │  - Stats      (derived read-only snapshot)                        │
//! └───────────────────────────────────────────────────────────────────┘
//!
//! publish(Event):
//!   ├─► enabled?  ──no──► silently discarded (no record, no count)
//!   ├─► History.push(record)              (oldest evicted over capacity)
//!   ├─► Registry.snapshot(event.key())    (copy; lock released before calls)
//!   ├─► handlers invoked
//!   │     ├─ publish():         in registration order, on the calling task
//!   │     └─ publish_fanout():  one worker per handler, joined
//!   └─► failures ──► HandlerFailure diagnostic event (never recursive,
//!                    never propagated to the publisher)
//! ```
//!
//! ## Features
//! | Area              | Description                                                       | Key types / traits              |
//! |-------------------|-------------------------------------------------------------------|---------------------------------|
//! | **Subscriptions** | Register sync or async handlers per event type, opaque ids.      | [`Handle`], [`HandleAsync`]     |
//! | **Publishing**    | Sequential or fan-out delivery, isolated per-handler failures.   | [`EventBus`]                    |
//! | **Vocabulary**    | Well-known app events plus string-keyed custom events.           | [`Event`], [`EventKey`], [`Payload`] |
//! | **History**       | Bounded ledger of recent traffic for diagnostics.                | [`EventRecord`]                 |
//! | **Statistics**    | Point-in-time counters derived on demand.                        | [`BusStats`]                    |
//! | **Errors**        | Synchronous configuration errors only; delivery never errors.    | [`BusError`], [`HandlerFailure`]|
//!
//! ## Optional features
//! - `logging`: exports [`TraceWriter`], a demo subscriber that writes every
//!   event to the active `tracing` subscriber.
//!
//! ## Example
//! ```rust
//! use signalbus::{BusConfig, Event, EventBus, EventKey, Severity};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let bus = EventBus::builder(BusConfig::default()).build();
//!
//!     // Screens register handlers without knowing who publishes.
//!     let id = bus.subscribe(EventKey::Notification, |ev: &Event| {
//!         println!("notification: {:?}", ev.payload);
//!     });
//!
//!     // Producers publish without knowing who listens.
//!     bus.notify("Sync complete", "42 tasks refreshed", Severity::Success)
//!         .await;
//!
//!     assert_eq!(bus.stats().total_published, 1);
//!     assert_eq!(bus.history(10).len(), 1);
//!
//!     bus.unsubscribe(id);
//!     bus.cleanup();
//! }
//! ```

mod core;
mod error;
mod events;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{BusBuilder, BusConfig, BusStats, EventBus, SubscriptionId};
pub use crate::error::{BusError, HandlerFailure};
pub use crate::events::{DataAction, Event, EventKey, EventRecord, Payload, Severity};
pub use crate::subscribers::{AsyncHandler, Handle, HandleAsync};

// Optional: expose the demo trace subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use crate::subscribers::TraceWriter;
