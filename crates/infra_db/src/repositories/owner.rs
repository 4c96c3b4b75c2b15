//! Owner repository

use core_kernel::EntityId;
use domain_pet::{Owner, OwnerSearchOptions};
use sqlx::FromRow;

use crate::criteria::{fold_case, OrderBy, Predicate, Root, SqlValue};
use crate::error::DatabaseError;
use crate::generic::{GenericRepository, SearchCriteria};
use crate::mapping::EntityMapping;

/// Repository for owners
pub type OwnerRepository = GenericRepository<Owner, OwnerCriteria>;

/// Row in the `owners` table
#[derive(Debug, Clone, FromRow)]
pub struct OwnerRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl EntityMapping for Owner {
    type Row = OwnerRow;

    const TABLE: &'static str = "owners";
    const COLUMNS: &'static [&'static str] = &["id", "name", "email", "phone"];

    fn column_values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("name", self.name.as_str().into()),
            ("name_search", fold_case(&self.name).into()),
            ("email", self.email.as_str().into()),
            ("phone", self.phone.clone().into()),
        ]
    }

    fn from_row(row: OwnerRow) -> Result<Self, DatabaseError> {
        let id = EntityId::new(row.id).map_err(|e| DatabaseError::mapping(Self::TABLE, "id", e))?;

        Ok(Owner {
            id: Some(id),
            name: row.name,
            email: row.email,
            phone: row.phone,
        })
    }
}

/// Filtering and ordering for owners
///
/// Owners are listed by name, then email. Emails are stored lowercased, so
/// the email filter is lowercased before the exact comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerCriteria;

impl SearchCriteria<Owner> for OwnerCriteria {
    type Options = OwnerSearchOptions;

    fn build_order(&self, root: &Root) -> OrderBy {
        root.get("name").asc().then(root.get("email").asc())
    }

    fn build_predicate(&self, options: &OwnerSearchOptions, root: &Root) -> Predicate {
        Predicate::all([
            options
                .name
                .as_deref()
                .map(|name| root.get("name_search").contains_ignore_case(name)),
            options
                .email
                .as_deref()
                .map(|email| root.get("email").eq(email.trim().to_lowercase())),
        ])
    }
}
