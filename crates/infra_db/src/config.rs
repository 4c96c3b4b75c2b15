//! Database settings loaded from the environment
//!
//! Settings are read from `DATABASE_*` variables, e.g. `DATABASE_URL` or
//! `DATABASE_MAX_CONNECTIONS`. A `.env` file in the working directory is
//! loaded first when present.

use serde::Deserialize;
use std::time::Duration;

use crate::pool::DatabaseConfig;

/// Environment variable prefix for database settings
pub const ENV_PREFIX: &str = "DATABASE";

/// Database settings as they appear in the environment
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// SQLite connection string
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

impl DatabaseSettings {
    /// Loads settings from `.env` and the process environment
    ///
    /// Variables already set in the process take precedence over `.env`.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads settings from the given environment source
    pub fn from_environment(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Converts the settings into a pool configuration
    pub fn into_config(self) -> DatabaseConfig {
        DatabaseConfig::new(self.url)
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .busy_timeout(Duration::from_millis(self.busy_timeout_ms))
    }
}

impl From<DatabaseSettings> for DatabaseConfig {
    fn from(settings: DatabaseSettings) -> Self {
        settings.into_config()
    }
}
