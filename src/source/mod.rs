//! State sources driven by the producer loop
//!
//! A state source owns the domain state, advances it once per tick and
//! exposes it as an immutable snapshot. The producer calls it in a fixed
//! order: one `initialize`, any number of `tick`/`snapshot` pairs, one
//! `shutdown`.

mod tracker;

use thiserror::Error;

pub use tracker::{SimulatedTracker, TrackerConfig};

/// Errors raised while advancing a state source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("state source used before initialize()")]
    NotInitialized,

    #[error("state source failed: {0}")]
    Failed(String),
}

/// Domain state sampled by the producer loop
pub trait StateSource: Send + 'static {
    /// Immutable per-tick view of the state
    type Snapshot;

    /// Acquire resources; called once before the first tick
    fn initialize(&mut self) -> Result<(), SourceError>;

    /// Advance the state by one step
    fn tick(&mut self) -> Result<(), SourceError>;

    /// Current state; must not mutate anything
    fn snapshot(&self) -> Self::Snapshot;

    /// Release resources; called once after the last tick
    fn shutdown(&mut self);
}
