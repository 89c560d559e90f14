//! Wire protocol for subscribers
//!
//! Snapshots go out as JSON text frames. Subscribers may send a small set of
//! control messages back.

mod encoder;
mod messages;

pub use encoder::{EncodeError, JsonEncoder, SnapshotEncoder};
pub use messages::{ClientMessage, PongMessage};
