//! Sessions and units of work
//!
//! Every repository call runs inside exactly one of these scopes:
//!
//! - [`Session`]: a pooled connection for read-only work, released when the
//!   session is dropped.
//! - [`UnitOfWork`]: a pooled connection with an open transaction. It ends
//!   with [`UnitOfWork::complete`], which commits on success and rolls back on
//!   failure.
//!
//! Releasing a connection back to the pool cannot fail. A connection left in
//! a broken state is closed by the pool instead of being reused.

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{Sqlite, SqliteConnection};
use sqlx::Transaction;
use tracing::{trace, warn};

use crate::error::DatabaseError;
use crate::pool::DatabasePool;

/// Opens sessions and units of work on a connection pool
///
/// Cloning is cheap; clones share the same pool.
#[derive(Debug, Clone)]
pub struct SessionFactory {
    pool: DatabasePool,
}

impl SessionFactory {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool
    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Acquires a connection for read-only work
    pub async fn open_session(&self) -> Result<Session, DatabaseError> {
        let conn = self.pool.acquire().await?;
        trace!("Session opened");
        Ok(Session { conn })
    }

    /// Acquires a connection and begins a transaction on it
    pub async fn begin(&self) -> Result<UnitOfWork, DatabaseError> {
        let tx = self.pool.begin().await?;
        trace!("Unit of work started");
        Ok(UnitOfWork { tx })
    }
}

/// A pooled connection scoped to one read operation
pub struct Session {
    conn: PoolConnection<Sqlite>,
}

impl Session {
    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }
}

/// A transaction scoped to one write operation
///
/// Dropping a unit of work without completing it rolls the transaction back.
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.tx
    }

    /// Ends the unit of work according to the outcome of the operation
    ///
    /// An `Ok` outcome is committed and a commit failure is returned. An
    /// `Err` outcome is rolled back and the original error is returned; a
    /// failed rollback is logged and otherwise ignored.
    pub async fn complete<T>(self, outcome: Result<T, DatabaseError>) -> Result<T, DatabaseError> {
        match outcome {
            Ok(value) => {
                // A failed commit leaves the transaction open; sqlx rolls it
                // back when the connection is returned to the pool.
                self.tx.commit().await?;
                trace!("Unit of work committed");
                Ok(value)
            }
            Err(error) => {
                self.rollback_quietly().await;
                Err(error)
            }
        }
    }

    async fn rollback_quietly(self) {
        match self.tx.rollback().await {
            Ok(()) => trace!("Unit of work rolled back"),
            Err(e) => warn!("Rollback failed, ignoring: {}", e),
        }
    }
}
