//! Search options for retrieving filtered lists of entities
//!
//! Every field is optional; an unset field does not restrict the result.
//! How each field is matched (exact, case-insensitive substring, range) is
//! decided by the repository criteria for the entity.

use chrono::NaiveDate;
use core_kernel::EntityId;
use serde::{Deserialize, Serialize};

use crate::pet::Species;

/// Filters for pet searches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetSearchOptions {
    /// Case-insensitive substring of the pet name
    pub name: Option<String>,
    pub species: Option<Species>,
    pub owner_id: Option<EntityId>,
    /// Inclusive lower bound on the birth date
    pub born_after: Option<NaiveDate>,
    /// Inclusive upper bound on the birth date
    pub born_before: Option<NaiveDate>,
}

impl PetSearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, fragment: impl Into<String>) -> Self {
        self.name = Some(fragment.into());
        self
    }

    pub fn species(mut self, species: Species) -> Self {
        self.species = Some(species);
        self
    }

    pub fn owner(mut self, owner_id: EntityId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn born_between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.born_after = Some(from);
        self.born_before = Some(to);
        self
    }

    /// Returns true if no filter is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.species.is_none()
            && self.owner_id.is_none()
            && self.born_after.is_none()
            && self.born_before.is_none()
    }
}

/// Filters for owner searches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSearchOptions {
    /// Case-insensitive substring of the owner name
    pub name: Option<String>,
    /// Exact email, compared case-insensitively
    pub email: Option<String>,
}

impl OwnerSearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, fragment: impl Into<String>) -> Self {
        self.name = Some(fragment.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}
