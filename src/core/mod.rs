//! Bus core: registry, dispatch, history, statistics.
//!
//! This module contains the embedded implementation of the bus. The public
//! API from this module is [`EventBus`] (with [`BusBuilder`] and
//! [`BusConfig`]), plus the read-only [`BusStats`] snapshot and the opaque
//! [`SubscriptionId`] token.
//!
//! Internal modules:
//! - [`registry`]: event-type to subscription mapping, snapshot discipline;
//! - [`dispatch`]: guarded handler invocation, sequential and fan-out;
//! - [`history`]: bounded FIFO ledger and the monotonic publish counter;
//! - [`stats`]: derived statistics snapshot;
//! - [`bus`]: the facade tying them together;
//! - [`builder`]: construction with pre-seeded subscriptions.

mod builder;
mod bus;
mod config;
mod dispatch;
mod history;
mod registry;
mod stats;

pub use builder::BusBuilder;
pub use bus::EventBus;
pub use config::BusConfig;
pub use registry::SubscriptionId;
pub use stats::BusStats;
