//! The ingestion-and-broadcast pipeline.
//!
//! [`Relay`] ties the [`SystemState`] to the [`SubscriberRegistry`]:
//!
//! - [`Relay::ingest`] validates a raw reading and hands it to
//!   [`Relay::record`], which applies it under the state write lock and
//!   broadcasts the resulting update before releasing the lock.
//! - [`Relay::connect`] captures a snapshot under the state read lock and
//!   registers the new subscriber, with its `init` message already queued,
//!   before releasing the lock.
//!
//! Because the two paths exclude each other, every subscriber sees each
//! event exactly once: inside its `init` snapshot or as an `update`.

use chrono::Utc;
use proxwatch_types::{DetectionEvent, RelayMessage, StatusResponse, SubscriberId};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::ingest::{validate_reading, ValidationError};
use crate::registry::{Subscriber, SubscriberRegistry, Subscription};
use crate::state::SystemState;

/// Shared relay: the single owner of the system state and the subscriber
/// set.
#[derive(Debug)]
pub struct Relay {
    state: RwLock<SystemState>,
    registry: SubscriberRegistry<RelayMessage>,
}

impl Relay {
    /// Create a relay starting from the seed state.
    pub fn new() -> Self {
        Self::with_state(SystemState::seeded())
    }

    /// Create a relay starting from an arbitrary state.
    pub fn with_state(state: SystemState) -> Self {
        Self {
            state: RwLock::new(state),
            registry: SubscriberRegistry::new(),
        }
    }

    /// Validate a raw reading and record it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `distance` is missing, not numeric,
    /// or negative. State is untouched and nothing is broadcast.
    pub async fn ingest(&self, raw: &Value) -> Result<DetectionEvent, ValidationError> {
        let distance = validate_reading(raw)?;
        Ok(self.record(distance).await)
    }

    /// Apply an already valid reading and broadcast the update.
    ///
    /// The broadcast is dispatched after the mutation completes but before
    /// the write lock is released.
    pub async fn record(&self, distance: f64) -> DetectionEvent {
        let mut state = self.state.write().await;
        let event = state.apply_reading(distance, Utc::now());
        let update = RelayMessage::Update(state.update_for(event.clone()));
        let receivers = self.registry.broadcast(&update);
        let incident_count = state.incident_count();
        drop(state);

        if event.status.is_intruder() {
            info!(distance, incident_count, "intruder detected");
        }
        debug!(distance, status = ?event.status, receivers, "reading applied");

        event
    }

    /// Register a new subscriber and queue its `init` snapshot.
    ///
    /// The returned [`Subscription`] yields the `init` message first,
    /// followed by every update recorded after the snapshot was taken.
    pub async fn connect(&self) -> Subscription<RelayMessage> {
        let state = self.state.read().await;
        let (subscriber, subscription) = Subscriber::channel();
        subscriber.deliver(RelayMessage::Init(state.snapshot()));
        self.registry.register(subscriber);
        drop(state);

        subscription
    }

    /// Remove a subscriber whose connection has ended.
    pub fn disconnect(&self, id: SubscriberId) {
        self.registry.unregister(id);
    }

    /// Current distance, incident count, and device status.
    pub async fn status(&self) -> StatusResponse {
        self.state.read().await.status()
    }

    /// Up to `limit` newest log entries, newest first.
    pub async fn logs(&self, limit: usize) -> Vec<DetectionEvent> {
        self.state.read().await.recent_logs(limit)
    }

    /// Number of connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }
}

impl Default for Relay {
    fn default() -> Self {
        Self::new()
    }
}
