//! Mutex-guarded registry of live subscribers

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

use super::connection::{Connection, SendError};
use crate::types::{ConnectionId, Payload};

/// State guarded by the registry lock
#[derive(Default)]
struct Inner {
    connections: HashMap<ConnectionId, Arc<dyn Connection>>,
    done: bool,
}

/// Outcome of one broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BroadcastReport {
    /// Members visited by this broadcast
    pub attempted: usize,
    /// Deliveries handed to the transport
    pub delivered: usize,
    /// Members whose transport had already closed
    pub closed: usize,
    /// Members skipped because their queue was full
    pub backpressured: usize,
    /// Shutdown flag as read under the broadcast's lock
    pub done: bool,
}

impl BroadcastReport {
    /// Number of members that did not receive the payload
    pub fn failed(&self) -> usize {
        self.closed + self.backpressured
    }
}

/// Thread-safe set of active subscriber connections plus the shutdown flag
///
/// The registry only references connections. It never closes them and never
/// evicts a member on a failed send; membership changes only through
/// [`add`](Self::add) and [`remove`](Self::remove).
pub struct ConnectionRegistry {
    inner: Mutex<Inner>,
    shutdown: Condvar,
}

impl ConnectionRegistry {
    /// Create an empty registry with the shutdown flag cleared
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            shutdown: Condvar::new(),
        }
    }

    /// Register a connection
    ///
    /// Returns false if a connection with the same id is already a member;
    /// the existing entry is kept.
    pub fn add(&self, connection: Arc<dyn Connection>) -> bool {
        let id = connection.id();
        let mut inner = self.inner.lock();
        if inner.connections.contains_key(&id) {
            trace!(conn_id = %id, "duplicate registration ignored");
            return false;
        }
        inner.connections.insert(id, connection);
        true
    }

    /// Unregister a connection
    ///
    /// Returns false if the id was not a member. That is an expected race
    /// (close before open was observed, or a double close), not an error.
    pub fn remove(&self, id: ConnectionId) -> bool {
        let removed = self.inner.lock().connections.remove(&id).is_some();
        if !removed {
            trace!(conn_id = %id, "removal of unknown connection ignored");
        }
        removed
    }

    /// Check if a connection is currently registered
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.inner.lock().connections.contains_key(&id)
    }

    /// Get the number of registered connections
    pub fn len(&self) -> usize {
        self.inner.lock().connections.len()
    }

    /// Check if the registry has no members
    pub fn is_empty(&self) -> bool {
        self.inner.lock().connections.is_empty()
    }

    /// Ids of the current members, sorted
    pub fn member_ids(&self) -> Vec<ConnectionId> {
        let mut ids: Vec<_> = self.inner.lock().connections.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Send `payload` to every member and return the shutdown flag
    pub fn broadcast(&self, payload: &Payload) -> bool {
        self.broadcast_report(payload).done
    }

    /// Send `payload` to every member, reporting per-member outcomes
    ///
    /// The lock is held for the whole fan-out, so the set of members visited
    /// is exactly the membership at the instant the lock was taken.
    pub fn broadcast_report(&self, payload: &Payload) -> BroadcastReport {
        let inner = self.inner.lock();
        let mut report = BroadcastReport {
            attempted: inner.connections.len(),
            done: inner.done,
            ..BroadcastReport::default()
        };

        for (id, connection) in inner.connections.iter() {
            match connection.send(payload) {
                Ok(()) => report.delivered += 1,
                Err(SendError::Closed) => {
                    debug!(conn_id = %id, "send skipped: connection closed");
                    report.closed += 1;
                }
                Err(SendError::Backpressure) => {
                    debug!(conn_id = %id, "send skipped: subscriber lagging");
                    report.backpressured += 1;
                }
            }
        }

        report
    }

    /// Set the shutdown flag and wake any waiter
    ///
    /// Returns true only for the call that performed the false→true
    /// transition.
    pub fn request_shutdown(&self) -> bool {
        let mut inner = self.inner.lock();
        let first = !inner.done;
        inner.done = true;
        drop(inner);
        self.shutdown.notify_all();
        first
    }

    /// Read the shutdown flag
    pub fn is_shutdown(&self) -> bool {
        self.inner.lock().done
    }

    /// Block for up to `timeout` or until shutdown is requested
    ///
    /// Returns the shutdown flag at wake-up.
    pub fn wait_for_shutdown(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut inner = self.inner.lock();
        while !inner.done {
            if self.shutdown.wait_until(&mut inner, deadline).timed_out() {
                break;
            }
        }
        inner.done
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ConnectionRegistry")
            .field("members", &inner.connections.len())
            .field("done", &inner.done)
            .finish()
    }
}
