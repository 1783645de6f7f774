//! Services served behind the authorizer.
//!
//! - `biz`: pass-through business endpoints.
//! - `logging`: live event stream.
//! - `stats`: interval statistics stream.

pub mod biz;
pub mod logging;
pub mod stats;

pub use logging::LogStream;
pub use stats::StatsAggregator;
