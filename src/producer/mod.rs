//! Producer loop
//!
//! A dedicated thread ticks the state source, encodes the snapshot and
//! broadcasts it through the registry, then waits one tick interval. The
//! loop learns it should stop from the registry's shutdown flag, read under
//! the same lock that publishes each tick.

mod runner;
mod settings;
mod stats;

pub use runner::{ProducerHandle, TelemetryProducer};
pub use settings::{FailurePolicy, ProducerSettings, DEFAULT_TICK_INTERVAL};
pub use stats::{ProducerStats, StatsSnapshot};
