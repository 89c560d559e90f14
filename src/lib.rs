//! Telemetry Fan-out Server
//!
//! A background producer samples a tracker every tick and broadcasts the
//! serialized snapshot to every connected WebSocket subscriber.
//!
//! # Features
//!
//! - **Consistent fan-out**: membership and the shutdown flag share one lock,
//!   so each broadcast sees a stable set of subscribers
//! - **Best effort**: a failing or lagging subscriber never stalls the others
//! - **Clean shutdown**: stopping the producer joins its thread; no broadcast
//!   happens after `stop` returns
//!
//! # Modules
//!
//! - `types`: Core data structures (ConnectionId, Payload, TrackerSnapshot)
//! - `registry`: Connection trait and the synchronized subscriber set
//! - `producer`: Tick loop, its handle and counters
//! - `source`: State source trait and the simulated tracker
//! - `protocol`: Snapshot encoders and client control messages
//! - `server`: Lifecycle handler and server bootstrap
//! - `api`: Axum router and WebSocket transport
//! - `config`: Command-line configuration
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use telemetry_fanout::{
//!     ConnectionRegistry, JsonEncoder, ProducerSettings, SimulatedTracker, TelemetryProducer,
//! };
//!
//! fn main() -> telemetry_fanout::TelemetryResult<()> {
//!     let registry = Arc::new(ConnectionRegistry::new());
//!     let producer = TelemetryProducer::new(
//!         Arc::clone(&registry),
//!         SimulatedTracker::with_users(2),
//!         JsonEncoder,
//!         ProducerSettings::with_interval(Duration::from_millis(50)),
//!     );
//!     let handle = producer.start()?;
//!     // ... register connections through a LifecycleHandler ...
//!     handle.stop()
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod producer;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod source;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{Cli, ServerConfig};
pub use error::{TelemetryError, TelemetryResult};
pub use producer::{FailurePolicy, ProducerHandle, ProducerSettings, TelemetryProducer};
pub use protocol::{JsonEncoder, SnapshotEncoder};
pub use registry::{Connection, ConnectionRegistry, SendError};
pub use server::{LifecycleHandler, TelemetryServer};
pub use source::{SimulatedTracker, SourceError, StateSource};
pub use types::{ConnectionId, Payload, TrackerSnapshot};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
