//! Shared type definitions for the Proxwatch telemetry relay.
//!
//! This crate is the single source of truth for every payload that crosses
//! the wire, either as an HTTP response or as a real-time channel message.
//! Types flow downstream to `TypeScript` via `ts-rs` for the dashboard.
//!
//! # Modules
//!
//! - [`event`] -- Detection events and their intruder classification
//! - [`ids`] -- Type-safe UUID wrapper for subscriber identifiers
//! - [`messages`] -- HTTP response bodies and real-time channel messages

pub mod event;
pub mod ids;
pub mod messages;

// Re-export all public types at crate root for convenience.
pub use event::{DetectionEvent, DetectionStatus, INTRUDER_THRESHOLD_CM, TIMESTAMP_FORMAT};
pub use ids::SubscriberId;
pub use messages::{
    ErrorBody, IngestResponse, InitPayload, RelayMessage, StatusResponse, UpdatePayload,
};
