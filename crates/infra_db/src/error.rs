//! Database error types
//!
//! Engine failures are carried unchanged inside [`DatabaseError::Sql`]; the
//! remaining variants describe conditions detected by the repository itself.

use core_kernel::EntityId;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish the connection pool
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// No stored entity has the requested identifier
    #[error("{entity} with id '{id}' not found")]
    NotFound { entity: &'static str, id: EntityId },

    /// An update was requested for an entity that was never inserted
    #[error("{entity} has no identifier; insert it before updating")]
    MissingIdentifier { entity: &'static str },

    /// An insert was requested for an entity that already has an identifier
    #[error("{entity} with id '{id}' is already persisted")]
    AlreadyPersisted { entity: &'static str, id: EntityId },

    /// A stored row could not be converted into its domain type
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Error reported by the database engine
    #[error(transparent)]
    Sql(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    ///
    /// # Example
    ///
    /// ```rust
    /// use core_kernel::EntityId;
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("pets", EntityId::new(7).unwrap());
    /// assert!(error.to_string().contains("pets"));
    /// assert!(error.is_not_found());
    /// ```
    pub fn not_found(entity: &'static str, id: EntityId) -> Self {
        DatabaseError::NotFound { entity, id }
    }

    /// Creates a mapping error for a column holding an unexpected value
    pub fn mapping(entity: &'static str, column: &str, detail: impl std::fmt::Display) -> Self {
        DatabaseError::Mapping(format!("{}.{}: {}", entity, column, detail))
    }

    /// Returns the engine error, if this is one
    pub fn as_sql(&self) -> Option<&sqlx::Error> {
        match self {
            DatabaseError::Sql(error) => Some(error),
            _ => None,
        }
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DatabaseError::NotFound { .. } | DatabaseError::Sql(sqlx::Error::RowNotFound)
        )
    }

    /// Checks if the engine rejected a duplicate value
    pub fn is_unique_violation(&self) -> bool {
        self.error_kind() == Some(ErrorKind::UniqueViolation)
    }

    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self.error_kind(),
            Some(
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            )
        )
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_)
                | DatabaseError::Sql(
                    sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
                )
        )
    }

    fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            DatabaseError::Sql(sqlx::Error::Database(db_err)) => Some(db_err.kind()),
            _ => None,
        }
    }
}
