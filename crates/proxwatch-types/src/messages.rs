//! HTTP response bodies and real-time channel messages.
//!
//! Field names are camelCase on the wire to match the dashboard client.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::event::{DetectionEvent, serialize_distance};

// ---------------------------------------------------------------------------
// Real-time channel
// ---------------------------------------------------------------------------

/// Snapshot sent once to a newly connected subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct InitPayload {
    /// Last applied distance reading.
    #[serde(serialize_with = "serialize_distance")]
    pub current_distance: f64,
    /// Number of intruder readings since process start.
    pub incident_count: u64,
    /// Most recent log entries, newest first.
    pub logs: Vec<DetectionEvent>,
}

/// Update pushed to every open subscriber after a successful ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayload {
    /// Distance of the reading just applied.
    #[serde(serialize_with = "serialize_distance")]
    pub current_distance: f64,
    /// Incident counter after the reading was applied.
    pub incident_count: u64,
    /// The event the reading produced.
    pub latest_log: DetectionEvent,
}

/// A message on the real-time channel.
///
/// Serialized as `{"type": "init" | "update", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum RelayMessage {
    /// Initial snapshot, delivered only to the connecting subscriber.
    Init(InitPayload),
    /// Ongoing update, delivered to all subscribers.
    Update(UpdatePayload),
}

// ---------------------------------------------------------------------------
// HTTP bodies
// ---------------------------------------------------------------------------

/// Body of `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Last applied distance reading.
    #[serde(serialize_with = "serialize_distance")]
    pub current_distance: f64,
    /// Number of intruder readings since process start.
    pub incident_count: u64,
    /// Always `"Online"` while the relay is serving.
    pub device_status: String,
    /// Always `true` while the relay is serving.
    pub system_active: bool,
}

impl StatusResponse {
    /// Build the status body for a running relay.
    pub fn online(current_distance: f64, incident_count: u64) -> Self {
        Self {
            current_distance,
            incident_count,
            device_status: String::from("Online"),
            system_active: true,
        }
    }
}

/// Body of a successful `POST /api/sensor-data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    /// Always `true`; failures use [`ErrorBody`].
    pub success: bool,
    /// The event the reading produced.
    pub log_entry: DetectionEvent,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ErrorBody {
    /// Human-readable failure description.
    pub error: String,
}
