//! Demo sensor simulator.
//!
//! Produces a synthetic distance reading on a fixed interval and records it
//! through [`Relay::record`], the same path validated external readings
//! take, so subscribers cannot tell the two apart. The task stops when its
//! [`CancellationToken`] is cancelled.

use std::sync::Arc;

use rand::Rng;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::SimulatorConfig;
use crate::relay::Relay;

/// Draw a whole-centimeter distance uniformly from `min..=max`.
pub fn sample_distance(rng: &mut impl Rng, min: u32, max: u32) -> f64 {
    f64::from(rng.random_range(min..=max))
}

/// Spawn the simulator on a background Tokio task.
///
/// Returns `None` without spawning anything when the simulator is
/// disabled. The first reading is produced one interval after spawning.
pub fn spawn_simulator(
    relay: Arc<Relay>,
    config: &SimulatorConfig,
    cancel: CancellationToken,
) -> Option<JoinHandle<()>> {
    if !config.enabled {
        info!("Sensor simulator disabled");
        return None;
    }

    let period = config.interval();
    let (min, max) = (config.min_distance_cm, config.max_distance_cm);

    let handle = tokio::spawn(async move {
        let start = Instant::now().checked_add(period).unwrap_or_else(Instant::now);
        let mut ticker = time::interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("Sensor simulator cancelled");
                    return;
                }
                _ = ticker.tick() => {
                    let distance = sample_distance(&mut rand::rng(), min, max);
                    relay.record(distance).await;
                }
            }
        }
    });

    info!(interval_ms = config.interval_ms, min, max, "Sensor simulator started");

    Some(handle)
}
