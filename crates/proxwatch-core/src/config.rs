//! Configuration loading and typed config structures for the relay.
//!
//! Configuration lives in an optional `proxwatch-config.yaml`. Every field
//! has a default, so an absent file or a partial file is fine. Two
//! environment variables override the file after loading:
//!
//! - `PORT` overrides `server.port`
//! - `SIMULATOR_ENABLED` (`false` / `0` / `off` / `no`) disables the simulator
//!
//! Detection constants (threshold, log capacity, snapshot depth) are fixed
//! in code and not configurable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

/// Longest accepted simulator interval (one day).
pub const MAX_INTERVAL_MS: u64 = 86_400_000;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but makes no sense.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level relay configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RelayConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Demo sensor simulator settings.
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

impl RelayConfig {
    /// Load configuration from a YAML file, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise start from defaults. Environment
    /// overrides apply either way.
    ///
    /// # Errors
    ///
    /// Same as [`RelayConfig::from_file`] when the file exists.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            let mut config = Self::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
    }

    /// Override values from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Override values from an arbitrary variable lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("PORT") {
            match val.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(e) => warn!(value = %val, error = %e, "ignoring invalid PORT"),
            }
        }
        if let Some(val) = lookup("SIMULATOR_ENABLED") {
            match val.trim().to_ascii_lowercase().as_str() {
                "false" | "0" | "off" | "no" => self.simulator.enabled = false,
                "true" | "1" | "on" | "yes" => self.simulator.enabled = true,
                _ => warn!(value = %val, "ignoring invalid SIMULATOR_ENABLED"),
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulator;
        if sim.interval_ms == 0 || sim.interval_ms > MAX_INTERVAL_MS {
            return Err(ConfigError::Invalid(format!(
                "simulator.interval_ms must be between 1 and {MAX_INTERVAL_MS}, got {}",
                sim.interval_ms
            )));
        }
        if sim.min_distance_cm > sim.max_distance_cm {
            return Err(ConfigError::Invalid(format!(
                "simulator.min_distance_cm ({}) exceeds max_distance_cm ({})",
                sim.min_distance_cm, sim.max_distance_cm
            )));
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// The host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// The TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory of static dashboard files, served when it exists.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

/// Demo sensor simulator settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulatorConfig {
    /// Whether synthetic readings are generated at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Milliseconds between synthetic readings.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Smallest synthetic distance (inclusive).
    #[serde(default = "default_min_distance_cm")]
    pub min_distance_cm: u32,

    /// Largest synthetic distance (inclusive).
    #[serde(default = "default_max_distance_cm")]
    pub max_distance_cm: u32,
}

impl SimulatorConfig {
    /// Time between synthetic readings, clamped to
    /// `1..=`[`MAX_INTERVAL_MS`] milliseconds.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.clamp(1, MAX_INTERVAL_MS))
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: default_interval_ms(),
            min_distance_cm: default_min_distance_cm(),
            max_distance_cm: default_max_distance_cm(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

const fn default_true() -> bool {
    true
}

const fn default_interval_ms() -> u64 {
    5000
}

const fn default_min_distance_cm() -> u32 {
    5
}

const fn default_max_distance_cm() -> u32 {
    200
}
