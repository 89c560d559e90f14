//! Telemetry server bootstrap
//!
//! Wires the registry, the producer thread and the WebSocket transport
//! together and owns the shutdown sequence:
//!
//! 1. bind the listener (nothing is spawned if this fails)
//! 2. start the producer
//! 3. serve until the shutdown signal resolves
//! 4. close subscriber sockets, stop and join the producer

mod handlers;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::{create_router, AppState};
use crate::config::ServerConfig;
use crate::error::{TelemetryError, TelemetryResult};
use crate::producer::{ProducerSettings, ProducerStats, TelemetryProducer};
use crate::protocol::JsonEncoder;
use crate::registry::ConnectionRegistry;
use crate::source::SimulatedTracker;

pub use handlers::LifecycleHandler;

/// WebSocket telemetry server backed by a [`SimulatedTracker`]
pub struct TelemetryServer {
    config: ServerConfig,
    listener: TcpListener,
}

impl TelemetryServer {
    /// Bind the listening socket
    pub async fn bind(config: ServerConfig) -> TelemetryResult<Self> {
        let addr = config.socket_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| TelemetryError::Bind { addr, source })?;
        Ok(Self { config, listener })
    }

    /// Address actually bound (resolves port 0 in tests)
    pub fn local_addr(&self) -> TelemetryResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Run until `shutdown` resolves, then tear everything down
    ///
    /// Returns the producer's outcome if serving itself succeeded.
    pub async fn run<F>(self, shutdown: F) -> TelemetryResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Self { config, listener } = self;

        let registry = Arc::new(ConnectionRegistry::new());
        let producer = TelemetryProducer::new(
            Arc::clone(&registry),
            SimulatedTracker::with_users(config.max_users),
            JsonEncoder,
            ProducerSettings::with_interval(config.tick_interval),
        );
        let stats = producer.stats();
        let handle = producer.start()?;

        let state = Arc::new(AppState::new(
            LifecycleHandler::new(Arc::clone(&registry)),
            stats,
            config.outbound_buffer,
            config.tick_interval,
        ));
        let app = create_router(Arc::clone(&state));

        info!(
            addr = %listener.local_addr()?,
            "Starting WebSocket telemetry server"
        );

        let signal_state = Arc::clone(&state);
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown => info!("shutdown signal received"),
                    _ = producer_exited(Arc::clone(&signal_state.stats), config.tick_interval) => {
                        warn!("producer exited, shutting down server");
                    }
                }
                signal_state.begin_shutdown();
            })
            .await;

        // Joining blocks, keep it off the async workers
        let stopped = tokio::task::spawn_blocking(move || handle.stop())
            .await
            .map_err(|_| TelemetryError::ProducerPanicked)?;

        served.map_err(TelemetryError::Serve)?;
        info!(subscribers = registry.len(), "telemetry server stopped");
        stopped
    }
}

/// Resolves once the producer thread has left its loop
async fn producer_exited(stats: Arc<ProducerStats>, poll: Duration) {
    let mut interval = tokio::time::interval(poll);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    while stats.is_running() {
        interval.tick().await;
    }
}
