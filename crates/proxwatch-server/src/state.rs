//! Shared application state for the HTTP server.

use std::path::Path;
use std::sync::Arc;

use proxwatch_core::Relay;
use tower_http::services::ServeDir;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. Every
/// handler and every `WebSocket` connection goes through the same
/// [`Relay`].
#[derive(Debug, Clone)]
pub struct AppState {
    /// The ingestion-and-broadcast pipeline.
    pub relay: Arc<Relay>,
    /// Static dashboard files, when a directory is configured and exists.
    pub static_files: Option<ServeDir>,
}

impl AppState {
    /// Create application state backed by a seeded relay.
    pub fn new() -> Self {
        Self::with_relay(Arc::new(Relay::new()))
    }

    /// Create application state backed by an existing relay, e.g. one the
    /// simulator also feeds.
    pub const fn with_relay(relay: Arc<Relay>) -> Self {
        Self {
            relay,
            static_files: None,
        }
    }

    /// Serve static files from `dir`. Ignored if `dir` is not a directory.
    #[must_use]
    pub fn with_static_dir(mut self, dir: &Path) -> Self {
        if dir.is_dir() {
            tracing::info!(dir = %dir.display(), "Serving static files");
            self.static_files = Some(ServeDir::new(dir));
        } else {
            tracing::debug!(dir = %dir.display(), "Static directory not found, not serving files");
        }
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
