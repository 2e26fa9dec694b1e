//! Axum router construction.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with permissive CORS and request tracing.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- `WebSocket` relay stream on upgrade, dashboard otherwise
/// - `GET /ws` -- `WebSocket` relay stream (`init`, then `update`s)
/// - `GET /api/status` -- current distance and incident count
/// - `GET /api/logs` -- newest detection events
/// - `POST /api/sensor-data` -- ingest one reading
///
/// When the state carries static files, unmatched paths fall back to them
/// (the dashboard). CORS allows any origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        // WebSocket
        .route("/", get(ws::ws_root))
        .route("/ws", get(ws::ws_relay))
        // REST API
        .route("/api/status", get(handlers::get_status))
        .route("/api/logs", get(handlers::list_logs))
        .route("/api/sensor-data", post(handlers::post_sensor_data));

    let router = match state.static_files.clone() {
        Some(files) => router.fallback_service(files),
        None => router,
    };

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
