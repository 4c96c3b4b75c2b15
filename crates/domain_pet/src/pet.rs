//! Pet entity

use chrono::NaiveDate;
use core_kernel::{EntityId, Identifiable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PetError;
use crate::validation::{normalize_name, validate_microchip};

/// Animal species handled by the clinic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Dog,
    Cat,
    Bird,
    Rabbit,
    Other,
}

impl Species {
    /// Stable text code used in storage and search options
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Dog => "dog",
            Species::Cat => "cat",
            Species::Bird => "bird",
            Species::Rabbit => "rabbit",
            Species::Other => "other",
        }
    }

    /// All species, in declaration order
    pub fn all() -> [Species; 5] {
        [
            Species::Dog,
            Species::Cat,
            Species::Bird,
            Species::Rabbit,
            Species::Other,
        ]
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = PetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dog" => Ok(Species::Dog),
            "cat" => Ok(Species::Cat),
            "bird" => Ok(Species::Bird),
            "rabbit" => Ok(Species::Rabbit),
            "other" => Ok(Species::Other),
            other => Err(PetError::UnknownSpecies(other.to_string())),
        }
    }
}

/// A pet registered with the clinic
///
/// `id` stays `None` until the pet is inserted through a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: Option<EntityId>,
    pub name: String,
    pub species: Species,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    /// ISO 11784 microchip number, unique across all pets
    pub microchip: Option<String>,
    pub owner_id: Option<EntityId>,
}

impl Pet {
    /// Creates a new, not yet persisted pet
    ///
    /// # Errors
    ///
    /// Returns `PetError::InvalidName` if the name is blank or too long
    pub fn new(name: &str, species: Species) -> Result<Self, PetError> {
        Ok(Self {
            id: None,
            name: normalize_name(name)?,
            species,
            breed: None,
            birth_date: None,
            microchip: None,
            owner_id: None,
        })
    }

    /// Sets the breed
    pub fn with_breed(mut self, breed: impl Into<String>) -> Self {
        let breed = breed.into();
        let breed = breed.trim();
        self.breed = (!breed.is_empty()).then(|| breed.to_string());
        self
    }

    /// Sets the date of birth
    pub fn with_birth_date(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = Some(birth_date);
        self
    }

    /// Sets the microchip number
    ///
    /// # Errors
    ///
    /// Returns `PetError::InvalidMicrochip` unless the number is 15 digits
    pub fn with_microchip(mut self, number: &str) -> Result<Self, PetError> {
        self.microchip = Some(validate_microchip(number)?);
        Ok(self)
    }

    /// Links the pet to its owner
    pub fn with_owner(mut self, owner_id: EntityId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Changes the pet's name
    pub fn rename(&mut self, name: &str) -> Result<(), PetError> {
        self.name = normalize_name(name)?;
        Ok(())
    }

    /// Age in whole years on the given date, if the birth date is known
    pub fn age_on(&self, date: NaiveDate) -> Option<u32> {
        self.birth_date.and_then(|born| date.years_since(born))
    }
}

impl Identifiable for Pet {
    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }
}
