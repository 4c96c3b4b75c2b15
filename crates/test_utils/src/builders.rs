//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::NaiveDate;
use core_kernel::EntityId;
use domain_pet::{Owner, Pet, Species};

use crate::fixtures::DateFixtures;

/// Builder for constructing test pets
#[derive(Debug, Clone)]
pub struct TestPetBuilder {
    name: String,
    species: Species,
    breed: Option<String>,
    birth_date: Option<NaiveDate>,
    microchip: Option<String>,
    owner_id: Option<EntityId>,
}

impl Default for TestPetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPetBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            name: "Buddy".to_string(),
            species: Species::Dog,
            breed: None,
            birth_date: Some(DateFixtures::rex_birthday()),
            microchip: None,
            owner_id: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_species(mut self, species: Species) -> Self {
        self.species = species;
        self
    }

    pub fn with_breed(mut self, breed: impl Into<String>) -> Self {
        self.breed = Some(breed.into());
        self
    }

    pub fn with_birth_date(mut self, date: NaiveDate) -> Self {
        self.birth_date = Some(date);
        self
    }

    pub fn without_birth_date(mut self) -> Self {
        self.birth_date = None;
        self
    }

    pub fn with_microchip(mut self, number: impl Into<String>) -> Self {
        self.microchip = Some(number.into());
        self
    }

    pub fn with_owner(mut self, owner_id: EntityId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Builds the pet
    ///
    /// # Panics
    ///
    /// Panics if the name or microchip is invalid
    pub fn build(self) -> Pet {
        let mut pet = Pet::new(&self.name, self.species).expect("valid pet name");
        if let Some(breed) = self.breed {
            pet = pet.with_breed(breed);
        }
        if let Some(date) = self.birth_date {
            pet = pet.with_birth_date(date);
        }
        if let Some(number) = self.microchip {
            pet = pet.with_microchip(&number).expect("valid microchip");
        }
        if let Some(owner_id) = self.owner_id {
            pet = pet.with_owner(owner_id);
        }
        pet
    }
}

/// Builder for constructing test owners
#[derive(Debug, Clone)]
pub struct TestOwnerBuilder {
    name: String,
    email: String,
    phone: Option<String>,
}

impl Default for TestOwnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestOwnerBuilder {
    pub fn new() -> Self {
        Self {
            name: "Test Owner".to_string(),
            email: "owner@example.com".to_string(),
            phone: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Builds the owner
    ///
    /// # Panics
    ///
    /// Panics if the name or email is invalid
    pub fn build(self) -> Owner {
        let owner = Owner::new(&self.name, &self.email).expect("valid owner");
        match self.phone {
            Some(phone) => owner.with_phone(phone),
            None => owner,
        }
    }
}
