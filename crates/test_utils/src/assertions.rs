//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for repository results that give
//! more meaningful error messages than standard assertions.

use core_kernel::{EntityId, Identifiable};
use domain_pet::{Owner, Pet};
use std::collections::HashSet;

/// Returns the identifiers of persisted entities, in order
///
/// # Panics
///
/// Panics if any entity has no identifier
pub fn ids_of<E: Identifiable>(entities: &[E]) -> Vec<EntityId> {
    entities
        .iter()
        .map(|e| e.id().expect("entity should be persisted"))
        .collect()
}

/// Asserts that every entity has an identifier and no two share one
pub fn assert_ids_unique<E: Identifiable>(entities: &[E]) {
    let ids = ids_of(entities);
    let unique: HashSet<EntityId> = ids.iter().copied().collect();
    assert_eq!(
        unique.len(),
        ids.len(),
        "Duplicate identifiers in result: {:?}",
        ids
    );
}

/// Asserts that `subset` only contains entities also present in `all`
pub fn assert_subset_by_id<E: Identifiable>(subset: &[E], all: &[E]) {
    let all_ids: HashSet<EntityId> = ids_of(all).into_iter().collect();
    for id in ids_of(subset) {
        assert!(
            all_ids.contains(&id),
            "Entity {} is not part of the full result",
            id
        );
    }
}

/// Asserts that pets are ordered by name, then by identifier
pub fn assert_pets_in_default_order(pets: &[Pet]) {
    for pair in pets.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            (a.name.as_str(), a.id) < (b.name.as_str(), b.id),
            "Pets out of order: {:?} ({:?}) before {:?} ({:?})",
            a.name,
            a.id,
            b.name,
            b.id
        );
    }
}

/// Asserts that owners are ordered by name, then email
pub fn assert_owners_in_default_order(owners: &[Owner]) {
    for pair in owners.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            (a.name.as_str(), a.email.as_str()) <= (b.name.as_str(), b.email.as_str()),
            "Owners out of order: {:?} <{}> before {:?} <{}>",
            a.name,
            a.email,
            b.name,
            b.email
        );
    }
}

/// Asserts that two pets hold the same data, ignoring identifiers
pub fn assert_same_pet_data(actual: &Pet, expected: &Pet) {
    let strip = |pet: &Pet| Pet {
        id: None,
        ..pet.clone()
    };
    assert_eq!(strip(actual), strip(expected), "Pet data differs");
}
