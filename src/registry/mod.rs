//! Connection registry
//!
//! The registry is the single source of truth for who is currently
//! subscribed. Membership and the shutdown flag sit behind one lock so that
//! a broadcast sees a consistent set of members and reads the flag in the
//! same critical section.

mod connection;
mod members;

pub use connection::{Connection, SendError};
pub use members::{BroadcastReport, ConnectionRegistry};
