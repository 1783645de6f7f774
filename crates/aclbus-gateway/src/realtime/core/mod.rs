//! Realtime core components for the gateway runtime.
//!
//! The broadcast hub and its subscription handle.

mod hub;

pub use hub::{BroadcastHub, SubId, Subscription};
