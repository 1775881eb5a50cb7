//! # Event handlers for bus subscriptions.
//!
//! This module provides the two handler contracts and the built-in demo
//! subscriber.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   producer ── publish(Event) ──► EventBus ──► registry snapshot for key
//!                                                  │
//!                                                  ├──► Handle::on_event(&Event)       (sync)
//!                                                  └──► HandleAsync::on_event(&Event)  (awaited)
//! ```
//!
//! ## Handler flavors
//! - **Synchronous** handlers ([`Handle`]) for cheap, non-blocking reactions
//!   (update a view model, set a dirty flag).
//! - **Asynchronous** handlers ([`HandleAsync`]) for reactions that suspend
//!   (refetch data, write an audit record).

mod handle;

pub use handle::{AsyncHandler, Handle, HandleAsync};

#[cfg(feature = "logging")]
mod trace;

#[cfg(feature = "logging")]
pub use trace::TraceWriter;
