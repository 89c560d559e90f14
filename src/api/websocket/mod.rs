//! WebSocket transport for snapshot subscribers
//!
//! Provides the `/ws` endpoint. Every accepted socket becomes one registry
//! member for as long as it stays open.
//!
//! ## Features
//! - One JSON snapshot per tick, latest state wins
//! - Bounded per-connection queue; a lagging client skips ticks
//! - Application-level `ping`/`pong` heartbeat

pub mod connection;
pub mod handler;
pub mod state;

pub use connection::WsConnection;
pub use handler::ws_handler;
