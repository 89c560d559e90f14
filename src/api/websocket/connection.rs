//! Registry-facing side of a WebSocket subscriber

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::registry::{Connection, SendError};
use crate::types::{ConnectionId, Payload};

/// A WebSocket subscriber as seen by the registry
///
/// Payloads are queued to the socket task with `try_send`, so the producer
/// thread never waits on a slow client.
#[derive(Debug)]
pub struct WsConnection {
    id: ConnectionId,
    tx: mpsc::Sender<Payload>,
}

impl WsConnection {
    /// Create the registry handle and the queue the socket task drains
    pub fn channel(id: ConnectionId, capacity: usize) -> (Self, mpsc::Receiver<Payload>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { id, tx }, rx)
    }
}

impl Connection for WsConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn send(&self, payload: &Payload) -> Result<(), SendError> {
        self.tx.try_send(payload.clone()).map_err(|e| match e {
            TrySendError::Full(_) => SendError::Backpressure,
            TrySendError::Closed(_) => SendError::Closed,
        })
    }
}
