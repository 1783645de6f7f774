//! Records exchanged between the authorizer, the hub and stream subscribers.
//!
//! - [`CallMeta`]: what the transport knows about an inbound call.
//! - [`Event`]: one authorized call, published once and shared read-only.
//! - [`StatSnapshot`]: per-window counters emitted by the stats aggregator.
//!
//! None of these types depend on a transport; the gateway adapts HTTP headers
//! and socket info into `CallMeta` and serializes the rest as JSON.

pub mod event;
pub mod meta;

pub use event::{unix_now, Event, StatSnapshot};
pub use meta::{CallMeta, CONSUMER_KEY};
