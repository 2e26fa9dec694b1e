//! REST API endpoint handlers.
//!
//! Reads go through [`Relay::status`](proxwatch_core::Relay::status) and
//! [`Relay::logs`](proxwatch_core::Relay::logs); writes go through
//! [`Relay::ingest`](proxwatch_core::Relay::ingest), which also broadcasts
//! the update to every connected `WebSocket` client.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/status` | Current distance and incident count |
//! | `GET` | `/api/logs` | Newest detection events (`?limit=N`, default 50) |
//! | `POST` | `/api/sensor-data` | Ingest one reading (`{"distance": N}`) |

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use proxwatch_core::DEFAULT_LOG_LIMIT;
use proxwatch_types::{DetectionEvent, IngestResponse, StatusResponse};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the `GET /api/logs` endpoint.
///
/// `limit` is kept as a string so that unusable values fall back to the
/// default instead of rejecting the request.
#[derive(Debug, serde::Deserialize)]
pub struct LogsQuery {
    /// Maximum number of entries to return (default 50).
    pub limit: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /api/status
// ---------------------------------------------------------------------------

/// Return the current distance, incident count, and device status.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(state.relay.status().await)
}

// ---------------------------------------------------------------------------
// GET /api/logs
// ---------------------------------------------------------------------------

/// Return the newest detection events, newest first.
///
/// # Query Parameters
///
/// - `limit`: maximum number of entries. Anything that is not a positive
///   integer means 50.
pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LogsQuery>,
) -> Json<Vec<DetectionEvent>> {
    let limit = parse_limit(params.limit.as_deref());
    Json(state.relay.logs(limit).await)
}

// ---------------------------------------------------------------------------
// POST /api/sensor-data
// ---------------------------------------------------------------------------

/// Ingest one sensor reading.
///
/// The body is parsed as raw JSON regardless of `Content-Type`; only its
/// `distance` field is inspected.
pub async fn post_sensor_data(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<IngestResponse>, ApiError> {
    let raw: Value =
        serde_json::from_slice(&body).map_err(|e| ApiError::MalformedBody(e.to_string()))?;

    let log_entry = state.relay.ingest(&raw).await.inspect_err(|e| {
        tracing::debug!(error = %e, body = %raw, "rejected sensor reading");
    })?;

    Ok(Json(IngestResponse {
        success: true,
        log_entry,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse the `limit` query value, falling back to [`DEFAULT_LOG_LIMIT`].
fn parse_limit(raw: Option<&str>) -> usize {
    raw.and_then(leading_count)
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_LOG_LIMIT)
}

/// Reads the leading decimal digits of `raw`, ignoring anything after them.
/// Leading whitespace and a `+` sign are skipped; values too large for
/// `usize` saturate.
fn leading_count(raw: &str) -> Option<usize> {
    let rest = raw.trim_start();
    let rest = rest.strip_prefix('+').unwrap_or(rest);
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = rest.get(..end).filter(|d| !d.is_empty())?;
    Some(digits.parse::<usize>().unwrap_or(usize::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_when_absent_or_unusable() {
        assert_eq!(parse_limit(None), 50);
        assert_eq!(parse_limit(Some("")), 50);
        assert_eq!(parse_limit(Some("0")), 50);
        assert_eq!(parse_limit(Some("-3")), 50);
        assert_eq!(parse_limit(Some("ten")), 50);
    }

    #[test]
    fn limit_accepts_positive_integers() {
        assert_eq!(parse_limit(Some("5")), 5);
        assert_eq!(parse_limit(Some("200")), 200);
    }

    #[test]
    fn limit_uses_leading_digits_and_ignores_the_rest() {
        assert_eq!(parse_limit(Some("5abc")), 5);
        assert_eq!(parse_limit(Some("3.7")), 3);
        assert_eq!(parse_limit(Some("+7")), 7);
        assert_eq!(parse_limit(Some("  8")), 8);
        assert_eq!(parse_limit(Some("+")), 50);
        assert_eq!(parse_limit(Some("abc5")), 50);
    }

    #[test]
    fn oversized_limit_saturates() {
        assert_eq!(
            parse_limit(Some("99999999999999999999999999")),
            usize::MAX
        );
    }
}
