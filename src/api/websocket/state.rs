//! WebSocket application state

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::producer::ProducerStats;
use crate::server::LifecycleHandler;
use crate::types::{ConnectionId, ConnectionIdGenerator};

/// Shared application state for WebSocket connections
pub struct AppState {
    /// Registers and unregisters subscribers
    pub lifecycle: LifecycleHandler,

    /// Counters published by the producer thread
    pub stats: Arc<ProducerStats>,

    /// Queue depth for each subscriber
    pub outbound_buffer: usize,

    /// Producer cadence, reported by the status endpoint
    pub tick_interval: Duration,

    ids: ConnectionIdGenerator,
    shutdown_tx: watch::Sender<bool>,
}

impl AppState {
    pub fn new(
        lifecycle: LifecycleHandler,
        stats: Arc<ProducerStats>,
        outbound_buffer: usize,
        tick_interval: Duration,
    ) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            lifecycle,
            stats,
            outbound_buffer,
            tick_interval,
            ids: ConnectionIdGenerator::new(),
            shutdown_tx,
        }
    }

    /// Allocate an id for a newly accepted socket
    pub fn next_connection_id(&self) -> ConnectionId {
        self.ids.next_id()
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.lifecycle.registry().len()
    }

    /// Watch for server shutdown
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Tell every socket task to close
    pub fn begin_shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }

    /// Check if shutdown has begun
    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown_tx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ConnectionRegistry;

    fn test_state() -> AppState {
        let registry = Arc::new(ConnectionRegistry::new());
        AppState::new(
            LifecycleHandler::new(registry),
            Arc::new(ProducerStats::new()),
            4,
            Duration::from_millis(50),
        )
    }

    #[test]
    fn test_connection_ids_are_unique() {
        let state = test_state();
        assert_ne!(state.next_connection_id(), state.next_connection_id());
    }

    #[tokio::test]
    async fn test_begin_shutdown_notifies_receivers() {
        let state = test_state();
        let mut rx = state.shutdown_receiver();
        assert!(!state.is_shutting_down());

        state.begin_shutdown();

        rx.changed().await.unwrap();
        assert!(*rx.borrow());
        assert!(state.is_shutting_down());
    }
}
