//! Counters shared between the producer thread and observers

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};

use serde::Serialize;

/// Live producer counters
#[derive(Debug, Default)]
pub struct ProducerStats {
    ticks: AtomicU64,
    tick_failures: AtomicU64,
    failed_deliveries: AtomicU64,
    last_tick_at_ms: AtomicI64,
    running: AtomicBool,
}

/// Point-in-time copy of [`ProducerStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub ticks: u64,
    pub tick_failures: u64,
    pub failed_deliveries: u64,
    pub last_tick_at_ms: i64,
    pub running: bool,
}

impl ProducerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_tick(&self, at_ms: i64, failed_deliveries: usize) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
        self.failed_deliveries
            .fetch_add(failed_deliveries as u64, Ordering::Relaxed);
        self.last_tick_at_ms.store(at_ms, Ordering::Relaxed);
    }

    /// Count a tick whose source or encoder step failed
    pub(crate) fn record_failure(&self) {
        self.tick_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
    }

    /// Number of snapshots broadcast so far
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Check if the producer thread is inside its loop
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Copy every counter
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            tick_failures: self.tick_failures.load(Ordering::Relaxed),
            failed_deliveries: self.failed_deliveries.load(Ordering::Relaxed),
            last_tick_at_ms: self.last_tick_at_ms.load(Ordering::Relaxed),
            running: self.running.load(Ordering::SeqCst),
        }
    }
}
