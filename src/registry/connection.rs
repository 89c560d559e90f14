//! Subscriber connection abstraction

use std::fmt;

use thiserror::Error;

use crate::types::{ConnectionId, Payload};

/// Why a single delivery failed
///
/// Both cases are local to one subscriber and one tick. They never abort a
/// broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    /// The transport side of the connection has gone away
    #[error("connection closed")]
    Closed,

    /// The subscriber has not drained earlier payloads; this one is dropped
    #[error("outbound queue full")]
    Backpressure,
}

/// A transport-level subscriber the registry can deliver payloads to
///
/// Implementations must not block: `send` is called from the producer
/// thread while the registry lock is held.
pub trait Connection: Send + Sync + fmt::Debug {
    /// Identity of the underlying transport session
    fn id(&self) -> ConnectionId;

    /// Hand one payload to the transport
    fn send(&self, payload: &Payload) -> Result<(), SendError>;
}
