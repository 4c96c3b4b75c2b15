//! Table mapping for persisted entities
//!
//! SQLx maps rows to structs but knows nothing about tables, so each entity
//! describes its own table layout here. The generic repository uses the
//! mapping to build its `INSERT`, `UPDATE`, `DELETE` and `SELECT` statements.

use core_kernel::Identifiable;
use sqlx::sqlite::SqliteRow;
use sqlx::FromRow;

use crate::criteria::{Root, SqlValue};
use crate::error::DatabaseError;

/// Describes how an entity is stored
///
/// # Example
///
/// ```rust,ignore
/// impl EntityMapping for Owner {
///     type Row = OwnerRow;
///     const TABLE: &'static str = "owners";
///     const COLUMNS: &'static [&'static str] = &["id", "name", "email", "phone"];
///
///     fn column_values(&self) -> Vec<(&'static str, SqlValue)> {
///         vec![("name", self.name.clone().into()), ...]
///     }
///
///     fn from_row(row: OwnerRow) -> Result<Self, DatabaseError> { ... }
/// }
/// ```
pub trait EntityMapping: Identifiable + Send + Sync + Sized + 'static {
    /// Row type decoded from the columns in [`EntityMapping::COLUMNS`]
    type Row: for<'r> FromRow<'r, SqliteRow> + Send + Unpin;

    /// Table name
    const TABLE: &'static str;

    /// Integer primary key column, generated by the database on insert
    const ID_COLUMN: &'static str = "id";

    /// Columns selected when loading the entity, identifier included
    const COLUMNS: &'static [&'static str];

    /// Values of every writable column, identifier excluded
    fn column_values(&self) -> Vec<(&'static str, SqlValue)>;

    /// Converts a decoded row into the entity
    fn from_row(row: Self::Row) -> Result<Self, DatabaseError>;

    /// Query root for this entity's table
    fn root() -> Root {
        Root::new(Self::TABLE, Self::ID_COLUMN)
    }
}
