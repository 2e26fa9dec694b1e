//! In-memory system state: current reading, incident counter, and the
//! bounded detection log.
//!
//! [`SystemState`] itself is plain data with synchronous mutators. The
//! [`Relay`](crate::relay::Relay) owns it behind a single
//! [`tokio::sync::RwLock`] so that a reading, its counter update, and its
//! log entry are always observed together.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use proxwatch_types::{DetectionEvent, InitPayload, StatusResponse, UpdatePayload};

/// Maximum number of entries retained in the detection log.
pub const LOG_CAPACITY: usize = 100;

/// Number of newest log entries included in a connection snapshot.
pub const SNAPSHOT_DEPTH: usize = 20;

/// Number of log entries returned when no usable limit is requested.
pub const DEFAULT_LOG_LIMIT: usize = 50;

/// Distance reported before any reading has been applied.
const SEED_DISTANCE: f64 = 45.0;

/// Incident count reported before any reading has been applied.
const SEED_INCIDENT_COUNT: u64 = 12;

/// Seed log entries, newest first.
const SEED_LOG: [(&str, f64); 3] = [
    ("2023-10-27 14:30:05", 15.0),
    ("2023-10-27 14:28:10", 12.0),
    ("2023-10-27 10:15:00", 180.0),
];

/// The relay's mutable state.
///
/// The incident counter is independent of log retention: evicting an
/// intruder entry from the log never decrements it.
#[derive(Debug, Clone)]
pub struct SystemState {
    current_distance: f64,
    incident_count: u64,
    /// Newest entry at the front.
    log: VecDeque<DetectionEvent>,
}

impl SystemState {
    /// Create an empty state with zeroed counters.
    pub fn new() -> Self {
        Self {
            current_distance: 0.0,
            incident_count: 0,
            log: VecDeque::with_capacity(LOG_CAPACITY),
        }
    }

    /// Create the state the relay starts with: a small seed log and fixed
    /// initial counters.
    pub fn seeded() -> Self {
        let mut log = VecDeque::with_capacity(LOG_CAPACITY);
        log.extend(
            SEED_LOG
                .iter()
                .map(|&(timestamp, distance)| DetectionEvent::with_timestamp(timestamp, distance)),
        );
        Self {
            current_distance: SEED_DISTANCE,
            incident_count: SEED_INCIDENT_COUNT,
            log,
        }
    }

    /// Apply one reading taken at `at`.
    ///
    /// Classifies the reading, bumps the incident counter for intruders,
    /// and pushes the new event to the front of the log, evicting from the
    /// back once the log exceeds [`LOG_CAPACITY`]. The caller guarantees
    /// `distance` is finite and non-negative.
    pub fn apply_reading(&mut self, distance: f64, at: DateTime<Utc>) -> DetectionEvent {
        let event = DetectionEvent::new(at, distance);

        self.current_distance = distance;
        if event.status.is_intruder() {
            self.incident_count = self.incident_count.saturating_add(1);
        }

        self.log.push_front(event.clone());
        self.log.truncate(LOG_CAPACITY);

        event
    }

    /// Last applied distance reading.
    pub const fn current_distance(&self) -> f64 {
        self.current_distance
    }

    /// Number of intruder readings applied since process start, plus the
    /// seed count.
    pub const fn incident_count(&self) -> u64 {
        self.incident_count
    }

    /// Number of entries currently in the log.
    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    /// Up to `limit` newest log entries, newest first.
    pub fn recent_logs(&self, limit: usize) -> Vec<DetectionEvent> {
        self.log.iter().take(limit).cloned().collect()
    }

    /// Point-in-time snapshot for a newly connected subscriber.
    pub fn snapshot(&self) -> InitPayload {
        InitPayload {
            current_distance: self.current_distance,
            incident_count: self.incident_count,
            logs: self.recent_logs(SNAPSHOT_DEPTH),
        }
    }

    /// Update payload describing the state right after `event` was applied.
    pub fn update_for(&self, event: DetectionEvent) -> UpdatePayload {
        UpdatePayload {
            current_distance: self.current_distance,
            incident_count: self.incident_count,
            latest_log: event,
        }
    }

    /// Body of `GET /api/status`.
    pub fn status(&self) -> StatusResponse {
        StatusResponse::online(self.current_distance, self.incident_count)
    }
}

impl Default for SystemState {
    fn default() -> Self {
        Self::new()
    }
}
