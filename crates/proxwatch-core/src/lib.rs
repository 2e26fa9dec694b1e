//! Ingestion-and-broadcast core of the Proxwatch telemetry relay.
//!
//! # Architecture
//!
//! A single [`Relay`] owns the [`SystemState`] (current distance, incident
//! counter, bounded detection log) behind one lock, together with the
//! [`SubscriberRegistry`] of connected real-time clients. Readings enter
//! through [`Relay::ingest`] (validated external input) or
//! [`Relay::record`] (the simulator), mutate the state, and are broadcast
//! to every open subscriber. New subscribers receive a consistent snapshot
//! from [`Relay::connect`] before any update.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration with environment overrides
//! - [`ingest`] -- Reading validation and the [`ValidationError`] type
//! - [`registry`] -- Subscriber registry (register, unregister, broadcast)
//! - [`relay`] -- The pipeline tying state and subscribers together
//! - [`simulator`] -- Periodic synthetic readings for demos
//! - [`state`] -- The in-memory state store

pub mod config;
pub mod ingest;
pub mod registry;
pub mod relay;
pub mod simulator;
pub mod state;

pub use config::{ConfigError, MAX_INTERVAL_MS, RelayConfig, ServerConfig, SimulatorConfig};
pub use ingest::{validate_reading, ValidationError};
pub use registry::{Subscriber, SubscriberRegistry, Subscription};
pub use relay::Relay;
pub use simulator::spawn_simulator;
pub use state::{DEFAULT_LOG_LIMIT, LOG_CAPACITY, SNAPSHOT_DEPTH, SystemState};
