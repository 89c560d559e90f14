//! Producer tuning

use std::time::Duration;

/// Interval between ticks when none is configured
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// What the producer does when a tick, snapshot or encode step fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop producing and report the error from `ProducerHandle::stop`
    #[default]
    Abort,
    /// Log the error, skip this tick's broadcast and keep going
    SkipTick,
}

/// Settings for a [`TelemetryProducer`](super::TelemetryProducer)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerSettings {
    pub tick_interval: Duration,
    pub failure_policy: FailurePolicy,
}

impl ProducerSettings {
    /// Settings with a custom tick interval
    pub fn with_interval(tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            ..Self::default()
        }
    }

    /// Replace the failure policy
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

impl Default for ProducerSettings {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            failure_policy: FailurePolicy::default(),
        }
    }
}
