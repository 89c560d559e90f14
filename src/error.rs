//! Crate-level error type
//!
//! Component errors (`SourceError`, `EncodeError`, `SendError`) live next to
//! the code that raises them and convert into [`TelemetryError`] where they
//! cross a process-level boundary.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

use crate::protocol::EncodeError;
use crate::source::SourceError;

/// Errors surfaced to the operator by the server and the producer
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Failed to spawn producer thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("State source error: {0}")]
    Source(#[from] SourceError),

    #[error("Snapshot encoding error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Producer thread panicked")]
    ProducerPanicked,

    #[error("Connection registry has already been shut down")]
    AlreadyShutDown,

    #[error("Server error: {0}")]
    Serve(#[source] io::Error),

    #[error("Signal handler error: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for telemetry operations
pub type TelemetryResult<T> = Result<T, TelemetryError>;
