//! Proxwatch relay binary.
//!
//! Wires together configuration, the relay, the sensor simulator, and the
//! HTTP server, then runs until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `proxwatch-config.yaml` (optional) and env
//! 3. Create the seeded relay
//! 4. Spawn the sensor simulator (unless disabled)
//! 5. Install the `Ctrl-C` handler
//! 6. Serve HTTP + `WebSocket` until shutdown

use std::path::Path;
use std::sync::Arc;

use proxwatch_core::{ConfigError, Relay, RelayConfig, spawn_simulator};
use proxwatch_server::{AppState, ServerError, start_server};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Path of the optional configuration file, relative to the working
/// directory.
const CONFIG_PATH: &str = "proxwatch-config.yaml";

/// Top-level error for the relay binary.
#[derive(Debug, thiserror::Error)]
enum AppError {
    /// Configuration loading failed.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP server failed to start or crashed.
    #[error("server error: {0}")]
    Server(#[from] ServerError),
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the server cannot bind.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("proxwatch starting");

    if let Err(e) = run().await {
        error!(error = %e, "proxwatch exited with error");
        return Err(e.into());
    }

    info!("proxwatch shutdown complete");
    Ok(())
}

async fn run() -> Result<(), AppError> {
    // 2. Load configuration.
    let config = RelayConfig::load_or_default(Path::new(CONFIG_PATH))?;
    info!(
        host = config.server.host,
        port = config.server.port,
        static_dir = %config.server.static_dir.display(),
        simulator_enabled = config.simulator.enabled,
        "Configuration loaded"
    );

    // 3. Create the relay.
    let relay = Arc::new(Relay::new());
    let status = relay.status().await;
    info!(
        current_distance = status.current_distance,
        incident_count = status.incident_count,
        "Relay state seeded"
    );

    // 4. Spawn the simulator.
    let shutdown = CancellationToken::new();
    let simulator = spawn_simulator(Arc::clone(&relay), &config.simulator, shutdown.child_token());

    // 5. Ctrl-C cancels everything.
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received shutdown signal");
                    shutdown.cancel();
                }
                Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
            }
        });
    }

    // 6. Serve.
    let state =
        Arc::new(AppState::with_relay(relay).with_static_dir(&config.server.static_dir));
    let served = start_server(&config.server, state, shutdown.clone()).await;

    shutdown.cancel();
    if let Some(handle) = simulator
        && let Err(e) = handle.await
    {
        error!(error = %e, "Sensor simulator task failed");
    }

    served?;
    Ok(())
}
