//! Producer thread and its handle

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info, warn};

use super::settings::{FailurePolicy, ProducerSettings};
use super::stats::ProducerStats;
use crate::error::{TelemetryError, TelemetryResult};
use crate::protocol::SnapshotEncoder;
use crate::registry::{BroadcastReport, ConnectionRegistry};
use crate::source::StateSource;
use crate::utils::now_millis;

const THREAD_NAME: &str = "telemetry-producer";

/// Drives a [`StateSource`] and broadcasts its snapshots
///
/// Lifecycle: `initialize` once, then repeated tick → snapshot → encode →
/// broadcast → wait, then `shutdown` once when the registry's shutdown flag
/// is observed.
pub struct TelemetryProducer<S, E> {
    registry: Arc<ConnectionRegistry>,
    source: S,
    encoder: E,
    settings: ProducerSettings,
    stats: Arc<ProducerStats>,
}

impl<S, E> TelemetryProducer<S, E>
where
    S: StateSource,
    E: SnapshotEncoder<S::Snapshot>,
{
    /// Create a producer that is not yet running
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        source: S,
        encoder: E,
        settings: ProducerSettings,
    ) -> Self {
        Self {
            registry,
            source,
            encoder,
            settings,
            stats: Arc::new(ProducerStats::new()),
        }
    }

    /// Counters this producer will update
    pub fn stats(&self) -> Arc<ProducerStats> {
        Arc::clone(&self.stats)
    }

    /// Spawn the producer thread
    ///
    /// Fails if the registry has already been shut down or the thread
    /// cannot be created.
    pub fn start(self) -> TelemetryResult<ProducerHandle> {
        if self.registry.is_shutdown() {
            return Err(TelemetryError::AlreadyShutDown);
        }

        let registry = Arc::clone(&self.registry);
        let stats = Arc::clone(&self.stats);
        let interval_ms = self.settings.tick_interval.as_millis() as u64;

        stats.set_running(true);
        let thread = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || self.run())
            .map_err(|e| {
                stats.set_running(false);
                TelemetryError::Spawn(e)
            })?;

        info!(interval_ms, "telemetry producer started");
        Ok(ProducerHandle {
            registry,
            stats,
            thread: Some(thread),
        })
    }

    fn run(mut self) -> TelemetryResult<()> {
        // Cleared on every exit, unwinding included
        let _running = RunningGuard(Arc::clone(&self.stats));

        if let Err(e) = self.source.initialize() {
            error!(error = %e, "state source failed to initialize");
            return Err(e.into());
        }

        let outcome = self.produce();

        self.source.shutdown();
        info!(ticks = self.stats.ticks(), "telemetry producer stopped");
        outcome
    }

    fn produce(&mut self) -> TelemetryResult<()> {
        loop {
            match self.step() {
                Ok(report) if report.done => return Ok(()),
                Ok(_) => {}
                Err(e) => {
                    self.stats.record_failure();
                    match self.settings.failure_policy {
                        FailurePolicy::Abort => {
                            error!(error = %e, "tick failed, stopping producer");
                            return Err(e);
                        }
                        FailurePolicy::SkipTick => {
                            warn!(error = %e, "tick failed, skipping broadcast");
                        }
                    }
                }
            }

            if self.registry.wait_for_shutdown(self.settings.tick_interval) {
                return Ok(());
            }
        }
    }

    fn step(&mut self) -> TelemetryResult<BroadcastReport> {
        self.source.tick()?;
        let snapshot = self.source.snapshot();
        let payload = self.encoder.encode(&snapshot)?;

        let report = self.registry.broadcast_report(&payload);
        self.stats.record_tick(now_millis(), report.failed());

        if report.failed() > 0 {
            debug!(
                subscribers = report.attempted,
                failed = report.failed(),
                "broadcast partially delivered"
            );
        }
        Ok(report)
    }
}

struct RunningGuard(Arc<ProducerStats>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        if thread::panicking() {
            error!("telemetry producer panicked");
        }
        self.0.set_running(false);
    }
}

/// Handle to a running producer thread
///
/// [`stop`](Self::stop) sets the shutdown flag and joins the thread. Dropping
/// the handle does the same.
#[derive(Debug)]
pub struct ProducerHandle {
    registry: Arc<ConnectionRegistry>,
    stats: Arc<ProducerStats>,
    thread: Option<JoinHandle<TelemetryResult<()>>>,
}

impl ProducerHandle {
    /// Counters updated by the producer thread
    pub fn stats(&self) -> Arc<ProducerStats> {
        Arc::clone(&self.stats)
    }

    /// Check if the producer thread has exited
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Request shutdown and wait for the producer thread to exit
    ///
    /// When this returns no further broadcast will happen and the state
    /// source has been shut down. The result is the producer's own outcome.
    pub fn stop(mut self) -> TelemetryResult<()> {
        self.shutdown_and_join()
    }

    fn shutdown_and_join(&mut self) -> TelemetryResult<()> {
        if self.registry.request_shutdown() {
            info!("producer shutdown requested");
        }
        match self.thread.take() {
            Some(thread) => thread
                .join()
                .map_err(|_| TelemetryError::ProducerPanicked)?,
            None => Ok(()),
        }
    }
}

impl Drop for ProducerHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            if let Err(e) = self.shutdown_and_join() {
                warn!(error = %e, "producer exited with error");
            }
        }
    }
}
