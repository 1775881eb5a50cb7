//! Event data model: routing keys, payloads, envelopes, history records.
//!
//! ## Contents
//! - [`EventKey`], [`Payload`], [`Event`] typed event vocabulary and envelope
//! - [`Severity`], [`DataAction`] payload field enums
//! - [`EventRecord`] bounded-history ledger entry
//!
//! ## Quick reference
//! - **Producers** build events via the `Event::*` constructors (or the bus
//!   convenience wrappers) and hand them to `EventBus::publish`.
//! - **Consumers** receive `&Event` in their handler and match on
//!   [`Event::payload`].

mod event;
mod record;

pub use event::{DataAction, Event, EventKey, Payload, Severity};
pub use record::EventRecord;
