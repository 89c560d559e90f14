//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use super::websocket::{handler::ws_handler, state::AppState};
use crate::utils::{millis_between, now_millis};

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // Subscribers are browser dashboards served from anywhere
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket endpoint
        .route("/ws", get(ws_handler))
        // Health check
        .route("/health", get(health_check))
        .route("/api/status", get(status))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Producer and subscriber summary
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub subscribers: usize,
    pub running: bool,
    pub ticks: u64,
    pub tick_failures: u64,
    pub failed_deliveries: u64,
    pub tick_interval_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_tick_age_ms: Option<u64>,
}

async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let stats = state.stats.snapshot();
    let last_tick_age_ms =
        (stats.ticks > 0).then(|| millis_between(stats.last_tick_at_ms, now_millis()));

    Json(StatusResponse {
        subscribers: state.subscriber_count(),
        running: stats.running,
        ticks: stats.ticks,
        tick_failures: stats.tick_failures,
        failed_deliveries: stats.failed_deliveries,
        tick_interval_ms: state.tick_interval.as_millis() as u64,
        last_tick_age_ms,
    })
}
