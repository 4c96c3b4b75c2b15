//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::{Duration, NaiveDate};
use domain_pet::{Pet, PetSearchOptions, Species};
use proptest::prelude::*;

/// Strategy for generating valid Species values
pub fn species_strategy() -> impl Strategy<Value = Species> {
    prop_oneof![
        Just(Species::Dog),
        Just(Species::Cat),
        Just(Species::Bird),
        Just(Species::Rabbit),
        Just(Species::Other),
    ]
}

/// Strategy for generating capitalized pet names
///
/// The alphabet is small and mixes accented letters with ASCII, so
/// generated search fragments often hit and case folding beyond ASCII is
/// exercised.
pub fn pet_name_strategy() -> impl Strategy<Value = String> {
    "[A-HÉÅØÜ][a-hæéåøü]{1,11}"
}

/// Strategy for generating name search fragments in mixed case
pub fn name_fragment_strategy() -> impl Strategy<Value = String> {
    "[a-hA-HéÉåÅøØüÜ]{1,2}"
}

/// Strategy for generating birth dates between 2000 and the end of 2024
pub fn birth_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..9_131).prop_map(|days| {
        NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date") + Duration::days(days)
    })
}

/// Strategy for generating unsaved pets without microchips
///
/// Microchips are unique in storage, so tests that insert many generated
/// pets assign them separately.
pub fn pet_strategy() -> impl Strategy<Value = Pet> {
    (
        pet_name_strategy(),
        species_strategy(),
        proptest::option::of(birth_date_strategy()),
    )
        .prop_map(|(name, species, birth_date)| {
            let pet = Pet::new(&name, species).expect("generated name is valid");
            match birth_date {
                Some(date) => pet.with_birth_date(date),
                None => pet,
            }
        })
}

/// Strategy for generating search options without an owner filter
pub fn pet_search_options_strategy() -> impl Strategy<Value = PetSearchOptions> {
    (
        proptest::option::of(name_fragment_strategy()),
        proptest::option::of(species_strategy()),
        proptest::option::of(birth_date_strategy()),
    )
        .prop_map(|(name, species, born_after)| PetSearchOptions {
            name,
            species,
            owner_id: None,
            born_after,
            born_before: None,
        })
}
