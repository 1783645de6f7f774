//! Realtime runtime (event fan-out) for the aclBus gateway.
//!
//! The hub owns the subscriber registry; `types` holds the small vocabulary
//! shared by the hub and the stream services.

pub mod core;
pub mod types;

pub use core::{BroadcastHub, SubId, Subscription};
pub use types::{PublishReport, StreamEnd, StreamSink};
