//! Integration tests for the relay's HTTP API.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used, clippy::float_cmp, clippy::unreachable)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use proxwatch_server::router::build_router;
use proxwatch_server::state::AppState;
use proxwatch_types::RelayMessage;
use serde_json::Value;
use tower::ServiceExt;

fn make_router() -> (Arc<AppState>, Router) {
    let state = Arc::new(AppState::new());
    let router = build_router(Arc::clone(&state));
    (state, router)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn post_reading(router: &Router, body: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::post("/api/sensor-data")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_owned()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_status_reports_seed_state() {
    let (_, router) = make_router();

    let (status, json) = get_json(&router, "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["currentDistance"].as_f64(), Some(45.0));
    assert_eq!(json["incidentCount"], 12);
    assert_eq!(json["deviceStatus"], "Online");
    assert_eq!(json["systemActive"], true);
}

#[tokio::test]
async fn test_logs_default_returns_seed_log() {
    let (_, router) = make_router();

    let (status, json) = get_json(&router, "/api/logs").await;

    assert_eq!(status, StatusCode::OK);
    let logs = json.as_array().unwrap();
    assert_eq!(logs.len(), 3);
    assert_eq!(logs[0]["timestamp"], "2023-10-27 14:30:05");
    assert_eq!(logs[0]["status"], "INTRUDER");
    assert_eq!(logs[2]["status"], "Safe");
}

#[tokio::test]
async fn test_logs_respects_limit() {
    let (_, router) = make_router();

    let (_, json) = get_json(&router, "/api/logs?limit=1").await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let (status, json) = get_json(&router, "/api/logs?limit=bogus").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_post_intruder_reading() {
    let (_, router) = make_router();

    let (status, json) = post_reading(&router, r#"{"distance": 10}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["logEntry"]["distance"].as_f64(), Some(10.0));
    assert_eq!(json["logEntry"]["status"], "INTRUDER");
    assert_eq!(json["logEntry"]["timestamp"].as_str().unwrap().len(), 19);

    let (_, json) = get_json(&router, "/api/status").await;
    assert_eq!(json["incidentCount"], 13);
    assert_eq!(json["currentDistance"].as_f64(), Some(10.0));
}

#[tokio::test]
async fn test_post_safe_reading_keeps_incident_count() {
    let (_, router) = make_router();

    let (status, json) = post_reading(&router, r#"{"distance": 150.5, "sensor": "door"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["logEntry"]["status"], "Safe");

    let (_, json) = get_json(&router, "/api/status").await;
    assert_eq!(json["incidentCount"], 12);
    assert_eq!(json["currentDistance"].as_f64(), Some(150.5));
}

#[tokio::test]
async fn test_post_negative_distance_is_rejected() {
    let (_, router) = make_router();

    let (status, json) = post_reading(&router, r#"{"distance": -5}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid distance value");

    let (_, json) = get_json(&router, "/api/status").await;
    assert_eq!(json["incidentCount"], 12);
    assert_eq!(json["currentDistance"].as_f64(), Some(45.0));
    let (_, logs) = get_json(&router, "/api/logs").await;
    assert_eq!(logs.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_post_non_numeric_distance_is_rejected() {
    let (_, router) = make_router();

    let (status, json) = post_reading(&router, r#"{"distance": "far"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid distance value");

    let (status, _) = post_reading(&router, r"{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, logs) = get_json(&router, "/api/logs").await;
    assert_eq!(logs.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_post_malformed_body_is_client_error() {
    let (_, router) = make_router();

    let (status, json) = post_reading(&router, "distance=10").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .starts_with("Malformed request body")
    );
}

#[tokio::test]
async fn test_log_is_capped_at_one_hundred() {
    let (_, router) = make_router();

    for i in 0..101_u32 {
        let body = format!(r#"{{"distance": {}}}"#, 40 + i);
        let (status, _) = post_reading(&router, &body).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, json) = get_json(&router, "/api/logs?limit=200").await;
    let logs = json.as_array().unwrap();
    assert_eq!(logs.len(), 100);
    assert_eq!(logs[0]["distance"].as_f64(), Some(140.0));
    assert_eq!(logs[99]["distance"].as_f64(), Some(41.0));
}

#[tokio::test]
async fn test_post_broadcasts_update_to_subscribers() {
    let (state, router) = make_router();
    let mut subscription = state.relay.connect().await;

    let (status, _) = post_reading(&router, r#"{"distance": 25}"#).await;
    assert_eq!(status, StatusCode::OK);

    let Some(RelayMessage::Init(init)) = subscription.try_recv() else {
        unreachable!("first message must be init");
    };
    assert_eq!(init.logs.len(), 3);

    let Some(RelayMessage::Update(update)) = subscription.try_recv() else {
        unreachable!("second message must be update");
    };
    assert_eq!(update.current_distance, 25.0);
    assert_eq!(update.incident_count, 13);
    assert_eq!(update.latest_log.distance, 25.0);
}

#[tokio::test]
async fn test_rejected_post_broadcasts_nothing() {
    let (state, router) = make_router();
    let mut subscription = state.relay.connect().await;

    let (status, _) = post_reading(&router, r#"{"distance": -1}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(matches!(subscription.try_recv(), Some(RelayMessage::Init(_))));
    assert!(subscription.try_recv().is_none());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (_, router) = make_router();

    let response = router
        .oneshot(
            Request::get("/api/status")
                .header(header::ORIGIN, "http://dashboard.local")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_ws_route_requires_upgrade() {
    let (_, router) = make_router();

    let response = router
        .oneshot(Request::get("/ws").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_static_files_are_served_when_configured() {
    let dir = std::env::temp_dir().join(format!("proxwatch-static-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<h1>dashboard</h1>").unwrap();

    let router = build_router(Arc::new(AppState::new().with_static_dir(&dir)));
    for path in ["/index.html", "/"] {
        let response = router
            .clone()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "{path}");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"<h1>dashboard</h1>", "{path}");
    }

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_root_without_upgrade_or_static_dir_returns_404() {
    let (_, router) = make_router();

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_static_dir_is_ignored() {
    let dir = std::env::temp_dir().join("proxwatch-static-does-not-exist");
    let state = AppState::new().with_static_dir(&dir);
    assert!(state.static_files.is_none());

    let router = build_router(Arc::new(state));
    let response = router
        .oneshot(Request::get("/index.html").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_nonexistent_route_returns_404() {
    let (_, router) = make_router();

    let response = router
        .oneshot(
            Request::get("/api/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
