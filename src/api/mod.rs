//! API module for HTTP and WebSocket endpoints
//!
//! This module provides the WebSocket subscriber endpoint and a small HTTP
//! surface for health and status checks.

pub mod http;
pub mod websocket;

pub use http::create_router;
pub use websocket::state::AppState;
