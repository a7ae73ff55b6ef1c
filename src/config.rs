//! Engine configuration.

use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::rng::{OsRandom, RandomSource, SeededRandom};

/// Environment variable overriding [`EngineConfig::database_url`].
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Environment variable overriding [`EngineConfig::seed`].
pub const SEED_VAR: &str = "SPLENDOR_SEED";

/// Settings for the engine binary.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct EngineConfig {
    /// Path of the SQLite database file.
    #[serde(default = "default_database_url")]
    database_url: String,

    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,

    /// Seed for dealing games; unset means OS randomness.
    #[serde(default)]
    seed: Option<u64>,
}

#[instrument]
fn default_database_url() -> String {
    "strictly_splendor.db".to_string()
}

#[instrument]
fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            log_filter: default_log_filter(),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(database_url = %config.database_url, "Config loaded successfully");
        Ok(config)
    }

    /// Reads `path` if it exists, falls back to defaults otherwise, then
    /// applies environment overrides.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = if path.as_ref().exists() {
            Self::from_file(path)?
        } else {
            debug!("No config file, using defaults");
            Self::default()
        };
        config.with_env_overrides(|name| std::env::var(name).ok())
    }

    /// Applies `DATABASE_URL` and `SPLENDOR_SEED` as looked up by `var`.
    pub fn with_env_overrides(
        mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = var(DATABASE_URL_VAR) {
            debug!(%url, "Database overridden from environment");
            self.database_url = url;
        }
        if let Some(seed) = var(SEED_VAR) {
            let seed = seed.trim().parse::<u64>().map_err(|e| {
                ConfigError::new(format!("{} must be an unsigned integer: {}", SEED_VAR, e))
            })?;
            warn!(seed, "Dealing with a fixed seed");
            self.seed = Some(seed);
        }
        Ok(self)
    }

    /// The random source games should be dealt with.
    pub fn random_source(&self) -> Box<dyn RandomSource> {
        match self.seed {
            Some(seed) => {
                let rng = SeededRandom::from_seed(seed);
                debug!(seed = rng.seed(), "Using seeded random source");
                Box::new(rng)
            }
            None => Box::new(OsRandom),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
