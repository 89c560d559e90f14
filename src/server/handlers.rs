//! Connection lifecycle handler
//!
//! Glue invoked by the transport when a subscriber connects or disconnects.
//! It only mutates the registry.

use std::sync::Arc;

use tracing::info;

use crate::registry::{Connection, ConnectionRegistry};
use crate::types::ConnectionId;

/// Maps transport open/close events onto registry membership
#[derive(Debug, Clone)]
pub struct LifecycleHandler {
    registry: Arc<ConnectionRegistry>,
}

impl LifecycleHandler {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// A subscriber connected
    pub fn on_open(&self, connection: Arc<dyn Connection>) {
        let id = connection.id();
        if self.registry.add(connection) {
            info!(conn_id = %id, subscribers = self.registry.len(), "subscriber connected");
        }
    }

    /// A subscriber disconnected; tolerates ids that were never opened
    pub fn on_close(&self, id: ConnectionId) {
        if self.registry.remove(id) {
            info!(conn_id = %id, subscribers = self.registry.len(), "subscriber disconnected");
        }
    }

    /// The registry this handler mutates
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SendError;
    use crate::types::Payload;

    #[derive(Debug)]
    struct NullConnection(ConnectionId);

    impl Connection for NullConnection {
        fn id(&self) -> ConnectionId {
            self.0
        }

        fn send(&self, _payload: &Payload) -> Result<(), SendError> {
            Ok(())
        }
    }

    #[test]
    fn test_open_and_close() {
        let registry = Arc::new(ConnectionRegistry::new());
        let handler = LifecycleHandler::new(Arc::clone(&registry));

        handler.on_open(Arc::new(NullConnection(ConnectionId::new(1))));
        handler.on_open(Arc::new(NullConnection(ConnectionId::new(2))));
        assert_eq!(registry.len(), 2);

        handler.on_close(ConnectionId::new(1));
        assert!(!registry.contains(ConnectionId::new(1)));
        assert!(registry.contains(ConnectionId::new(2)));
    }

    #[test]
    fn test_close_without_open_is_tolerated() {
        let registry = Arc::new(ConnectionRegistry::new());
        let handler = LifecycleHandler::new(Arc::clone(&registry));

        handler.on_close(ConnectionId::new(99));
        handler.on_close(ConnectionId::new(99));
        assert!(registry.is_empty());
    }
}
