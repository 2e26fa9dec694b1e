//! `WebSocket` handler for the real-time channel.
//!
//! Clients connect to `GET /ws`, or to `GET /` with an upgrade request.
//! The first frame they receive is an `init` snapshot; after that they
//! receive an `update` frame for every reading the relay records. Frames sent by the client are logged and
//! otherwise ignored.

use std::sync::Arc;

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Request, State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use proxwatch_core::Relay;
use tower::ServiceExt;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming relay messages.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_relay(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    upgrade_to_relay(ws, &state)
}

/// Serve the relay stream on the root path when the request is an
/// upgrade, and the dashboard (or 404) when it is plain HTTP.
///
/// # Route
///
/// `GET /`
pub async fn ws_root(
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Response {
    match (upgrade, &state.static_files) {
        (Ok(ws), _) => upgrade_to_relay(ws, &state),
        (Err(_), Some(files)) => files
            .clone()
            .oneshot(request)
            .await
            .map_or_else(|never| match never {}, IntoResponse::into_response),
        (Err(_), None) => StatusCode::NOT_FOUND.into_response(),
    }
}

fn upgrade_to_relay(ws: WebSocketUpgrade, state: &AppState) -> Response {
    let relay = Arc::clone(&state.relay);
    ws.on_upgrade(move |socket| handle_ws(socket, relay))
}

/// Handle the `WebSocket` lifecycle: connect to the relay, then forward
/// each queued message as a text frame until either side goes away.
async fn handle_ws(mut socket: WebSocket, relay: Arc<Relay>) {
    let mut subscription = relay.connect().await;
    let id = subscription.id();
    debug!(subscriber = %id, "WebSocket client connected");

    loop {
        tokio::select! {
            // Next message queued for this subscriber.
            queued = subscription.recv() => {
                let Some(message) = queued else {
                    debug!(subscriber = %id, "Subscription closed, shutting down WebSocket");
                    break;
                };
                let json = match serde_json::to_string(&message) {
                    Ok(j) => j,
                    Err(e) => {
                        warn!("Failed to serialize relay message: {e}");
                        continue;
                    }
                };
                if socket.send(Message::Text(json.into())).await.is_err() {
                    debug!(subscriber = %id, "WebSocket client disconnected (send failed)");
                    break;
                }
            }
            // Frames from the client.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(subscriber = %id, "WebSocket client disconnected");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!(subscriber = %id, "WebSocket client disconnected (pong failed)");
                            break;
                        }
                    }
                    Some(Ok(Message::Text(text))) => {
                        debug!(subscriber = %id, text = %text.as_str(), "Received client message");
                    }
                    Some(Ok(Message::Binary(data))) => {
                        debug!(subscriber = %id, bytes = data.len(), "Received binary client message");
                    }
                    Some(Ok(Message::Pong(_))) => {}
                    Some(Err(e)) => {
                        debug!(subscriber = %id, "WebSocket error: {e}");
                        break;
                    }
                }
            }
        }
    }

    relay.disconnect(id);
}
