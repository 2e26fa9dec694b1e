//! HTTP and `WebSocket` server for the Proxwatch telemetry relay.
//!
//! This crate provides an Axum server that exposes:
//!
//! - **REST endpoints** for reading status and the detection log, and for
//!   ingesting sensor readings
//! - **`WebSocket` endpoint** (`/ws`) that sends each client an `init`
//!   snapshot followed by live `update` messages
//! - **Static dashboard** files from a configurable directory
//!
//! All endpoints share one [`Relay`](proxwatch_core::Relay) held in
//! [`AppState`].

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use state::AppState;
