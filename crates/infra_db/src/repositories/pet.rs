//! Pet repository
//!
//! Pets are stored in the `pets` table. Species are stored as their text
//! code and resolved back through `Species::from_str`, so an unknown code in
//! the table surfaces as a mapping error rather than a panic.
//!
//! The `name_search` column carries the case-folded name. It is written on
//! every insert and update and never read back into a `Pet`.

use chrono::NaiveDate;
use core_kernel::EntityId;
use domain_pet::{Pet, PetSearchOptions};
use sqlx::FromRow;
use tracing::{debug, instrument};

use crate::criteria::{fold_case, OrderBy, Predicate, Root, SqlValue};
use crate::error::DatabaseError;
use crate::generic::{GenericRepository, SearchCriteria};
use crate::mapping::EntityMapping;

/// Repository for pets
pub type PetRepository = GenericRepository<Pet, PetCriteria>;

/// Row in the `pets` table
#[derive(Debug, Clone, FromRow)]
pub struct PetRow {
    pub id: i64,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub microchip: Option<String>,
    pub owner_id: Option<i64>,
}

impl EntityMapping for Pet {
    type Row = PetRow;

    const TABLE: &'static str = "pets";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "species",
        "breed",
        "birth_date",
        "microchip",
        "owner_id",
    ];

    fn column_values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("name", self.name.as_str().into()),
            ("name_search", fold_case(&self.name).into()),
            ("species", self.species.as_str().into()),
            ("breed", self.breed.clone().into()),
            ("birth_date", self.birth_date.into()),
            ("microchip", self.microchip.clone().into()),
            ("owner_id", self.owner_id.into()),
        ]
    }

    fn from_row(row: PetRow) -> Result<Self, DatabaseError> {
        let id = EntityId::new(row.id).map_err(|e| DatabaseError::mapping(Self::TABLE, "id", e))?;
        let species = row
            .species
            .parse()
            .map_err(|e| DatabaseError::mapping(Self::TABLE, "species", e))?;
        let owner_id = row
            .owner_id
            .map(EntityId::new)
            .transpose()
            .map_err(|e| DatabaseError::mapping(Self::TABLE, "owner_id", e))?;

        Ok(Pet {
            id: Some(id),
            name: row.name,
            species,
            breed: row.breed,
            birth_date: row.birth_date,
            microchip: row.microchip,
            owner_id,
        })
    }
}

/// Filtering and ordering for pets
///
/// Pets are listed by name. Every set search field narrows the result:
/// the name matches as a case-insensitive substring, species and owner match
/// exactly, and the birth date bounds are inclusive.
#[derive(Debug, Clone, Copy, Default)]
pub struct PetCriteria;

impl SearchCriteria<Pet> for PetCriteria {
    type Options = PetSearchOptions;

    fn build_order(&self, root: &Root) -> OrderBy {
        root.get("name").asc()
    }

    fn build_predicate(&self, options: &PetSearchOptions, root: &Root) -> Predicate {
        Predicate::all([
            options
                .name
                .as_deref()
                .map(|name| root.get("name_search").contains_ignore_case(name)),
            options
                .species
                .map(|species| root.get("species").eq(species.as_str())),
            options.owner_id.map(|owner| root.get("owner_id").eq(owner)),
            options.born_after.map(|date| root.get("birth_date").ge(date)),
            options.born_before.map(|date| root.get("birth_date").le(date)),
        ])
    }
}

impl GenericRepository<Pet, PetCriteria> {
    /// Finds the pet carrying the given microchip number
    #[instrument(skip(self))]
    pub async fn find_by_microchip(&self, microchip: &str) -> Result<Option<Pet>, DatabaseError> {
        let columns = Pet::COLUMNS.join(", ");
        let sql = format!("SELECT {} FROM {} WHERE microchip = ?", columns, Pet::TABLE);

        let mut session = self.sessions().open_session().await?;
        let row = sqlx::query_as::<_, PetRow>(&sql)
            .bind(microchip.trim())
            .fetch_optional(session.connection())
            .await?;

        debug!(found = row.is_some(), "Looked up pet by microchip");
        row.map(Pet::from_row).transpose()
    }
}
