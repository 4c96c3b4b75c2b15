//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the pet care entities. These fixtures
//! are designed to be consistent and predictable; none of them carries an
//! identifier, so each can be inserted as is.

use chrono::NaiveDate;
use domain_pet::{Owner, Pet, Species};

/// Fixture for owner test data
pub struct OwnerFixtures;

impl OwnerFixtures {
    pub fn alice() -> Owner {
        Owner::new("Alice Moreau", "alice@example.com")
            .expect("valid owner fixture")
            .with_phone("+33 1 23 45 67 89")
    }

    pub fn bruno() -> Owner {
        Owner::new("Bruno Diaz", "bruno@example.org").expect("valid owner fixture")
    }

    /// Owner with a unique email derived from `n`
    pub fn numbered(n: u32) -> Owner {
        Owner::new(&format!("Owner {:03}", n), &format!("owner{}@example.com", n))
            .expect("valid owner fixture")
    }
}

/// Fixture for pet test data
pub struct PetFixtures;

impl PetFixtures {
    /// Beagle born 2019-04-12 with a microchip
    pub fn rex() -> Pet {
        Pet::new("Rex", Species::Dog)
            .expect("valid pet fixture")
            .with_breed("Beagle")
            .with_birth_date(DateFixtures::rex_birthday())
            .with_microchip(MicrochipFixtures::REX)
            .expect("valid microchip fixture")
    }

    /// Cat without a birth date or microchip
    pub fn whiskers() -> Pet {
        Pet::new("Whiskers", Species::Cat).expect("valid pet fixture")
    }

    /// Rabbit born 2022-09-30
    pub fn clover() -> Pet {
        Pet::new("Clover", Species::Rabbit)
            .expect("valid pet fixture")
            .with_birth_date(DateFixtures::clover_birthday())
    }

    /// Pet with the given name and species and nothing else set
    pub fn named(name: &str, species: Species) -> Pet {
        Pet::new(name, species).expect("valid pet fixture")
    }
}

/// Fixture for microchip numbers
pub struct MicrochipFixtures;

impl MicrochipFixtures {
    pub const REX: &'static str = "250269604012345";

    /// Distinct valid microchip number for each `n`
    pub fn numbered(n: u32) -> String {
        format!("{:015}", 900_000_000_000_000u64 + u64::from(n))
    }
}

/// Fixture for date test data
pub struct DateFixtures;

impl DateFixtures {
    pub fn rex_birthday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 4, 12).expect("valid date")
    }

    pub fn clover_birthday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 9, 30).expect("valid date")
    }

    /// A fixed "today" for age calculations
    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
    }
}
