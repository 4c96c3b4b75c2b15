//! SQLite connection pools
//!
//! File databases run in WAL mode so readers and the single writer do not
//! block each other. An in-memory database lives only as long as its last
//! connection, so its pool holds exactly one connection that never expires,
//! whatever the configuration asks for.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::DatabaseError;

pub type DatabasePool = SqlitePool;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_LIFETIME: Duration = Duration::from_secs(30 * 60);
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(10 * 60);
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool settings for one SQLite database
///
/// ```rust
/// use infra_db::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("sqlite://data/pets.db")
///     .max_connections(4)
///     .busy_timeout(Duration::from_millis(500));
/// assert!(!config.is_in_memory());
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `sqlite://path/to/file.db`, or `sqlite::memory:`
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long `acquire` waits for a free connection
    pub connect_timeout: Duration,
    pub max_lifetime: Duration,
    pub idle_timeout: Duration,
    /// How long a statement waits on a locked database file
    pub busy_timeout: Duration,
    pub create_if_missing: bool,
}

impl DatabaseConfig {
    /// Settings for `url` with the default pool limits
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            connect_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            max_lifetime: DEFAULT_MAX_LIFETIME,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            create_if_missing: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn max_lifetime(mut self, lifetime: Duration) -> Self {
        self.max_lifetime = lifetime;
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// When false, opening a missing database file fails
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Returns true if the URL names an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    fn connect_options(&self) -> Result<SqliteConnectOptions, DatabaseError> {
        let options = SqliteConnectOptions::from_str(&self.url)
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?
            .busy_timeout(self.busy_timeout)
            .create_if_missing(self.create_if_missing);

        Ok(if self.is_in_memory() {
            options
        } else {
            options.journal_mode(SqliteJournalMode::Wal)
        })
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new().acquire_timeout(self.connect_timeout);
        if self.is_in_memory() {
            options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options
                .max_connections(self.max_connections)
                .min_connections(self.min_connections)
                .idle_timeout(self.idle_timeout)
                .max_lifetime(self.max_lifetime)
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new("sqlite://pets.db")
    }
}

/// Opens a pool for `config`
///
/// # Errors
///
/// `DatabaseError::ConnectionFailed` when the URL does not parse or the first
/// connection cannot be opened, e.g. a missing file with `create_if_missing`
/// off.
pub async fn create_pool(config: DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    let connect_options = config.connect_options()?;
    let pool_options = config.pool_options();

    info!(
        url = %config.url,
        max_connections = pool_options.get_max_connections(),
        in_memory = config.is_in_memory(),
        "Opening SQLite pool"
    );

    pool_options
        .connect_with(connect_options)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))
}

/// Opens a pool for `url` with the default settings
pub async fn create_pool_from_url(url: &str) -> Result<DatabasePool, DatabaseError> {
    create_pool(DatabaseConfig::new(url)).await
}
