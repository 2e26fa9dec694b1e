//! Detection events produced by the ingestion pipeline.
//!
//! A [`DetectionEvent`] is immutable once created. Its [`DetectionStatus`]
//! is derived from the reading's distance and never supplied by the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use ts_rs::TS;

/// Distance in centimeters below which a reading counts as an intruder.
pub const INTRUDER_THRESHOLD_CM: f64 = 30.0;

/// `chrono` format string for event timestamps (`YYYY-MM-DD HH:MM:SS`, UTC).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Largest whole number a JSON client can read back exactly (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Serialize a distance, writing whole values without a fraction.
///
/// `45.0` goes on the wire as `45`; `45.5` stays `45.5`.
///
/// # Errors
///
/// Propagates the serializer's error.
#[allow(
    clippy::trivially_copy_pass_by_ref,
    clippy::float_cmp,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn serialize_distance<S: Serializer>(distance: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    let value = *distance;
    if value.trunc() == value && (0.0..=MAX_EXACT_INTEGER).contains(&value) {
        // Whole and within u64 range, so the cast is exact.
        serializer.serialize_u64(value as u64)
    } else {
        serializer.serialize_f64(value)
    }
}

/// Classification of a single distance reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum DetectionStatus {
    /// Something is closer than [`INTRUDER_THRESHOLD_CM`].
    #[serde(rename = "INTRUDER")]
    Intruder,
    /// Nothing within the threshold.
    Safe,
}

impl DetectionStatus {
    /// Classify a distance reading in centimeters.
    pub fn classify(distance: f64) -> Self {
        if distance < INTRUDER_THRESHOLD_CM {
            Self::Intruder
        } else {
            Self::Safe
        }
    }

    /// Whether this status contributes to the incident counter.
    pub const fn is_intruder(self) -> bool {
        matches!(self, Self::Intruder)
    }
}

/// One entry in the detection log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DetectionEvent {
    /// When the reading was applied, formatted with [`TIMESTAMP_FORMAT`].
    pub timestamp: String,
    /// Sensor distance in centimeters.
    #[serde(serialize_with = "serialize_distance")]
    pub distance: f64,
    /// Classification derived from `distance`.
    pub status: DetectionStatus,
}

impl DetectionEvent {
    /// Build an event for a reading applied at `at`.
    pub fn new(at: DateTime<Utc>, distance: f64) -> Self {
        Self::with_timestamp(at.format(TIMESTAMP_FORMAT).to_string(), distance)
    }

    /// Build an event from an already formatted timestamp.
    ///
    /// Used for seed data that predates the process.
    pub fn with_timestamp(timestamp: impl Into<String>, distance: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            distance,
            status: DetectionStatus::classify(distance),
        }
    }
}
