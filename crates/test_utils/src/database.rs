//! Database Test Utilities
//!
//! Provides throwaway SQLite databases for integration tests. Each
//! [`TestDatabase`] lives in its own temporary directory with the schema from
//! `migrations/` applied, and is removed when dropped.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tracing::debug;

/// Schema applied to every test database
pub const SCHEMA: &str = include_str!("../../../migrations/0001_initial_schema.sql");

/// Database file name inside the temporary directory
const DATABASE_FILE: &str = "pets_test.db";

/// Default pool size for test databases
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Result type for test setup helpers
pub type TestResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// A file-backed SQLite database in a temporary directory
pub struct TestDatabase {
    dir: TempDir,
    pool: SqlitePool,
}

impl TestDatabase {
    /// Creates a new database with the schema applied
    ///
    /// # Errors
    ///
    /// Returns an error if the directory, the pool or the schema cannot be
    /// created
    pub async fn new() -> TestResult<Self> {
        Self::with_max_connections(DEFAULT_MAX_CONNECTIONS).await
    }

    /// Creates a new database whose pool holds at most `max` connections
    pub async fn with_max_connections(max: u32) -> TestResult<Self> {
        let dir = tempfile::tempdir()?;

        let options = SqliteConnectOptions::new()
            .filename(dir.path().join(DATABASE_FILE))
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        let test_db = Self { dir, pool };
        test_db.init_schema().await?;

        debug!(path = %test_db.path().display(), "Test database ready");
        Ok(test_db)
    }

    async fn init_schema(&self) -> TestResult<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Path of the database file
    pub fn path(&self) -> PathBuf {
        self.dir.path().join(DATABASE_FILE)
    }

    /// Connection URL for opening a second pool on the same file
    pub fn url(&self) -> String {
        format!("sqlite://{}", self.path().display())
    }

    /// Number of rows currently stored in `table`
    pub async fn count_rows(&self, table: &str) -> TestResult<i64> {
        let count = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Clears all data from the database while preserving the schema
    ///
    /// Generated identifiers restart from 1 afterwards.
    pub async fn clear_data(&self) -> TestResult<()> {
        for table in ["pets", "owners"] {
            sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&self.pool)
                .await?;
        }
        sqlx::query("DELETE FROM sqlite_sequence")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Helper macro for running database tests
///
/// ```rust,ignore
/// db_test!(test_starts_empty, |db| {
///     assert_eq!(db.count_rows("pets").await.unwrap(), 0);
/// });
/// ```
#[macro_export]
macro_rules! db_test {
    ($name:ident, |$db:ident| $body:block) => {
        #[tokio::test]
        async fn $name() {
            let $db = $crate::database::TestDatabase::new()
                .await
                .expect("Failed to create test database");
            $body
        }
    };
}
