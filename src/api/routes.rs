//! Route configuration.

use crate::api::{handlers, websocket};
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

/// Creates the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // WebSocket
        .route("/ws", get(websocket::ws_handler))
        // On-demand chain
        .route("/api/oc", get(handlers::get_option_chain))
        // Scans
        .route("/api/breakout_scan", post(handlers::breakout_scan))
        .route("/api/strategy_ltp_scan", post(handlers::strategy_ltp_scan))
        .route("/api/premium_surge", post(handlers::premium_surge))
        // Symbol universe
        .route("/api/suggested", get(handlers::suggested_symbols))
        .with_state(state)
}
