//! Data types for the telemetry fan-out server
//!
//! This module contains the values that flow through a tick: connection
//! identities, encoded payloads and the tracker snapshot.

mod connection_id;
mod payload;
mod tracking;

pub use connection_id::{ConnectionId, ConnectionIdGenerator};
pub use payload::Payload;
pub use tracking::{Joint, JointKind, TrackedUser, TrackerSnapshot, Vector3};
