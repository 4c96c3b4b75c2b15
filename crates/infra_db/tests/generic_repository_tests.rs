//! Integration tests for the generic repository
//!
//! Every test runs against its own temporary SQLite file with the schema
//! from `migrations/` applied.

use core_kernel::{EntityId, Identifiable, Repository};
use domain_pet::{Owner, OwnerSearchOptions, Pet, PetSearchOptions, Species};
use infra_db::{DatabaseError, OwnerRepository, PetRepository};
use test_utils::{
    assert_ids_unique, assert_owners_in_default_order, assert_pets_in_default_order,
    assert_same_pet_data, assert_subset_by_id, ids_of, init_test_tracing, DateFixtures,
    MicrochipFixtures, OwnerFixtures, PetFixtures, TestDatabase, TestOwnerBuilder,
    TestPetBuilder,
};

async fn setup() -> (TestDatabase, PetRepository, OwnerRepository) {
    init_test_tracing();
    let db = TestDatabase::new()
        .await
        .expect("Failed to create test database");
    let pets = PetRepository::from_pool(db.pool().clone());
    let owners = OwnerRepository::from_pool(db.pool().clone());
    (db, pets, owners)
}

fn id(value: i64) -> EntityId {
    EntityId::new(value).unwrap()
}

mod crud {
    use super::*;

    /// Insert, rename, delete: the full life of one pet
    #[tokio::test]
    async fn test_pet_lifecycle() {
        let (_db, pets, _) = setup().await;

        let mut rex = PetFixtures::named("Rex", Species::Dog);
        pets.insert(&mut rex).await.unwrap();
        assert_eq!(rex.id, Some(id(1)));

        let found = pets.find(id(1)).await.unwrap().expect("Rex should exist");
        assert_eq!(found.name, "Rex");
        assert_eq!(found, rex);

        rex.rename("Max").unwrap();
        pets.update(&rex).await.unwrap();

        let found = pets.find(id(1)).await.unwrap().expect("Max should exist");
        assert_eq!(found.id, Some(id(1)));
        assert_eq!(found.name, "Max");

        pets.delete(id(1)).await.unwrap();
        assert!(pets.find(id(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_returns_every_stored_field() {
        let (_db, pets, owners) = setup().await;

        let mut alice = OwnerFixtures::alice();
        owners.insert(&mut alice).await.unwrap();

        let mut rex = PetFixtures::rex().with_owner(alice.id.unwrap());
        pets.insert(&mut rex).await.unwrap();

        let found = pets.find(rex.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(found, rex);
        assert_eq!(found.breed.as_deref(), Some("Beagle"));
        assert_eq!(found.birth_date, Some(DateFixtures::rex_birthday()));
        assert_eq!(found.microchip.as_deref(), Some(MicrochipFixtures::REX));
        assert_eq!(found.owner_id, alice.id);
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let (_db, pets, _) = setup().await;

        let mut pet = PetFixtures::rex();
        pets.insert(&mut pet).await.unwrap();

        let mut changed = pet.clone().with_breed("Harrier");
        changed.birth_date = None;
        changed.microchip = None;
        pets.update(&changed).await.unwrap();

        let found = pets.find(pet.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(found, changed);
        assert_ne!(found, pet);
    }

    #[tokio::test]
    async fn test_identifiers_are_assigned_in_sequence() {
        let (_db, pets, _) = setup().await;

        let mut first = PetFixtures::whiskers();
        let mut second = PetFixtures::clover();
        pets.insert(&mut first).await.unwrap();
        pets.insert(&mut second).await.unwrap();

        assert!(first.is_persisted());
        assert!(first.id < second.id);
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let (_db, pets, _) = setup().await;
        assert!(pets.find(id(42)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_owner_delete_unlinks_pets() {
        let (_db, pets, owners) = setup().await;

        let mut bruno = OwnerFixtures::bruno();
        owners.insert(&mut bruno).await.unwrap();
        let mut pet = PetFixtures::whiskers().with_owner(bruno.id.unwrap());
        pets.insert(&mut pet).await.unwrap();

        owners.delete(bruno.id.unwrap()).await.unwrap();

        let found = pets.find(pet.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(found.owner_id, None);
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (_db, pets, _) = setup().await;

        let result = pets.delete(id(7)).await;

        match result {
            Err(DatabaseError::NotFound { entity, id: missing }) => {
                assert_eq!(entity, "pets");
                assert_eq!(missing, id(7));
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_twice_reports_second() {
        let (_db, pets, _) = setup().await;

        let mut pet = PetFixtures::whiskers();
        pets.insert(&mut pet).await.unwrap();

        pets.delete(pet.id.unwrap()).await.unwrap();
        let err = pets.delete(pet.id.unwrap()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_without_id_is_rejected() {
        let (db, pets, _) = setup().await;

        let err = pets.update(&PetFixtures::whiskers()).await.unwrap_err();

        assert!(matches!(err, DatabaseError::MissingIdentifier { entity: "pets" }));
        assert_eq!(db.count_rows("pets").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let (db, pets, _) = setup().await;

        let mut ghost = PetFixtures::whiskers();
        ghost.assign_id(id(99));

        let err = pets.update(&ghost).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(db.count_rows("pets").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_persisted_entity_is_rejected() {
        let (db, pets, _) = setup().await;

        let mut pet = PetFixtures::whiskers();
        pets.insert(&mut pet).await.unwrap();

        let err = pets.insert(&mut pet).await.unwrap_err();
        assert!(matches!(err, DatabaseError::AlreadyPersisted { entity: "pets", .. }));
        assert_eq!(db.count_rows("pets").await.unwrap(), 1);
    }

    /// A uniqueness violation rolls the insert back and leaves no trace
    #[tokio::test]
    async fn test_duplicate_microchip_leaves_no_partial_state() {
        let (db, pets, _) = setup().await;

        let mut rex = PetFixtures::rex();
        pets.insert(&mut rex).await.unwrap();

        let mut impostor = PetFixtures::named("Impostor", Species::Cat)
            .with_microchip(MicrochipFixtures::REX)
            .unwrap();
        let err = pets.insert(&mut impostor).await.unwrap_err();

        assert!(err.is_unique_violation());
        assert!(err.is_constraint_violation());
        assert!(err.as_sql().is_some());
        assert_eq!(impostor.id, None);

        let all = pets.retrieve_all().await.unwrap();
        assert_eq!(ids_of(&all), vec![rex.id.unwrap()]);
        assert_eq!(db.count_rows("pets").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_on_update_keeps_original() {
        let (_db, _, owners) = setup().await;

        let mut alice = OwnerFixtures::alice();
        let mut bruno = OwnerFixtures::bruno();
        owners.insert(&mut alice).await.unwrap();
        owners.insert(&mut bruno).await.unwrap();

        let mut changed = bruno.clone();
        changed.change_email("ALICE@example.com").unwrap();
        let err = owners.update(&changed).await.unwrap_err();
        assert!(err.is_unique_violation());

        let stored = owners.find(bruno.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(stored.email, "bruno@example.org");
    }

    #[tokio::test]
    async fn test_unknown_owner_is_a_constraint_violation() {
        let (_db, pets, _) = setup().await;

        let mut orphan = PetFixtures::whiskers().with_owner(id(404));
        let err = pets.insert(&mut orphan).await.unwrap_err();

        assert!(err.is_constraint_violation());
        assert!(!err.is_unique_violation());
        assert!(pets.retrieve_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_row_is_a_mapping_error() {
        let (db, pets, _) = setup().await;

        // Bypass the CHECK constraint the way a legacy import would.
        sqlx::raw_sql(
            "PRAGMA ignore_check_constraints = ON;
             INSERT INTO pets (name, name_search, species) VALUES ('Nessie', 'nessie', 'plesiosaur');",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = pets.retrieve_all().await.unwrap_err();
        assert!(matches!(err, DatabaseError::Mapping(_)));
        assert!(err.to_string().contains("pets.species"));
    }
}

mod ordering {
    use super::*;

    #[tokio::test]
    async fn test_retrieve_all_orders_by_name() {
        let (_db, pets, _) = setup().await;

        for name in ["Milo", "Bella", "Zeus"] {
            let mut pet = PetFixtures::named(name, Species::Dog);
            pets.insert(&mut pet).await.unwrap();
        }

        let all = pets.retrieve_all().await.unwrap();
        let names: Vec<&str> = all.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bella", "Milo", "Zeus"]);
    }

    #[tokio::test]
    async fn test_equal_names_fall_back_to_insertion_order() {
        let (_db, pets, _) = setup().await;

        let mut inserted = Vec::new();
        for species in [Species::Cat, Species::Dog, Species::Bird] {
            let mut pet = PetFixtures::named("Luna", species);
            pets.insert(&mut pet).await.unwrap();
            inserted.push(pet);
        }

        let all = pets.retrieve_all().await.unwrap();
        assert_eq!(all, inserted);
        assert_pets_in_default_order(&all);
    }

    #[tokio::test]
    async fn test_retrieve_all_is_stable() {
        let (_db, pets, _) = setup().await;

        for n in 0..12 {
            let mut pet = TestPetBuilder::new()
                .with_name(if n % 2 == 0 { "Even" } else { "Odd" })
                .build();
            pets.insert(&mut pet).await.unwrap();
        }

        let first = pets.retrieve_all().await.unwrap();
        let second = pets.retrieve_all().await.unwrap();
        assert_eq!(first, second);
        assert_ids_unique(&first);
    }

    #[tokio::test]
    async fn test_owners_order_by_name_then_email() {
        let (_db, _, owners) = setup().await;

        for (name, email) in [
            ("Sam", "sam.z@example.com"),
            ("Ada", "ada@example.com"),
            ("Sam", "sam.a@example.com"),
        ] {
            let mut owner = TestOwnerBuilder::new().with_name(name).with_email(email).build();
            owners.insert(&mut owner).await.unwrap();
        }

        let all = owners.retrieve_all().await.unwrap();
        assert_owners_in_default_order(&all);
        let emails: Vec<&str> = all.iter().map(|o| o.email.as_str()).collect();
        assert_eq!(
            emails,
            vec!["ada@example.com", "sam.a@example.com", "sam.z@example.com"]
        );
    }
}

mod searching {
    use super::*;
    use chrono::NaiveDate;

    async fn seed(pets: &PetRepository, owners: &OwnerRepository) -> (Owner, Vec<Pet>) {
        let mut alice = OwnerFixtures::alice();
        owners.insert(&mut alice).await.unwrap();
        let alice_id = alice.id.unwrap();

        let mut stored = Vec::new();
        for pet in [
            PetFixtures::rex().with_owner(alice_id),
            PetFixtures::whiskers().with_owner(alice_id),
            PetFixtures::clover(),
            TestPetBuilder::new()
                .with_name("Oreo")
                .with_species(Species::Cat)
                .with_birth_date(NaiveDate::from_ymd_opt(2020, 1, 15).unwrap())
                .build(),
            TestPetBuilder::new()
                .with_name("Kiwi")
                .with_species(Species::Bird)
                .without_birth_date()
                .build(),
        ] {
            let mut pet = pet;
            pets.insert(&mut pet).await.unwrap();
            stored.push(pet);
        }
        (alice, stored)
    }

    fn names(pets: &[Pet]) -> Vec<&str> {
        pets.iter().map(|p| p.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_empty_options_return_everything() {
        let (_db, pets, owners) = setup().await;
        seed(&pets, &owners).await;

        let filtered = pets.retrieve(&PetSearchOptions::new()).await.unwrap();
        let all = pets.retrieve_all().await.unwrap();
        assert_eq!(filtered, all);
        assert_eq!(all.len(), 5);
    }

    #[tokio::test]
    async fn test_name_matches_case_insensitive_substring() {
        let (_db, pets, owners) = setup().await;
        seed(&pets, &owners).await;

        let found = pets.retrieve(&PetSearchOptions::new().name("RE")).await.unwrap();
        assert_eq!(names(&found), vec!["Oreo", "Rex"]);
    }

    #[tokio::test]
    async fn test_species_and_owner_filters_combine() {
        let (_db, pets, owners) = setup().await;
        let (alice, _) = seed(&pets, &owners).await;

        let cats = pets
            .retrieve(&PetSearchOptions::new().species(Species::Cat))
            .await
            .unwrap();
        assert_eq!(names(&cats), vec!["Oreo", "Whiskers"]);

        let alices_cats = pets
            .retrieve(
                &PetSearchOptions::new()
                    .species(Species::Cat)
                    .owner(alice.id.unwrap()),
            )
            .await
            .unwrap();
        assert_eq!(names(&alices_cats), vec!["Whiskers"]);
    }

    #[tokio::test]
    async fn test_birth_date_bounds_are_inclusive() {
        let (_db, pets, owners) = setup().await;
        seed(&pets, &owners).await;

        let options = PetSearchOptions::new().born_between(
            DateFixtures::rex_birthday(),
            NaiveDate::from_ymd_opt(2020, 1, 15).unwrap(),
        );
        let found = pets.retrieve(&options).await.unwrap();
        assert_eq!(names(&found), vec!["Oreo", "Rex"]);
    }

    #[tokio::test]
    async fn test_no_match_is_empty() {
        let (_db, pets, owners) = setup().await;
        seed(&pets, &owners).await;

        let found = pets
            .retrieve(&PetSearchOptions::new().name("zzz"))
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_accented_names_match_in_any_case() {
        let (_db, pets, owners) = setup().await;
        seed(&pets, &owners).await;

        let mut elodie = PetFixtures::named("Élodie", Species::Cat);
        pets.insert(&mut elodie).await.unwrap();

        for fragment in ["Élo", "élo", "ÉLO", "LODIE"] {
            let found = pets
                .retrieve(&PetSearchOptions::new().name(fragment))
                .await
                .unwrap();
            assert_eq!(found, vec![elodie.clone()], "fragment {:?}", fragment);
        }

        let cats = pets
            .retrieve(&PetSearchOptions::new().name("é").species(Species::Cat))
            .await
            .unwrap();
        assert_eq!(names(&cats), vec!["Élodie"]);
    }

    #[tokio::test]
    async fn test_renamed_pet_is_found_by_new_name() {
        let (_db, pets, _) = setup().await;

        let mut pet = PetFixtures::named("Bruno", Species::Dog);
        pets.insert(&mut pet).await.unwrap();
        pet.rename("Ørjan").unwrap();
        pets.update(&pet).await.unwrap();

        let by_new = pets
            .retrieve(&PetSearchOptions::new().name("ØRJ"))
            .await
            .unwrap();
        assert_eq!(by_new, vec![pet]);

        let by_old = pets
            .retrieve(&PetSearchOptions::new().name("bruno"))
            .await
            .unwrap();
        assert!(by_old.is_empty());
    }

    #[tokio::test]
    async fn test_wildcards_in_fragment_match_literally() {
        let (_db, pets, _) = setup().await;

        for name in ["Lu_na", "Luxna", "Cent%", "Centavo", "Back\\slash"] {
            let mut pet = PetFixtures::named(name, Species::Other);
            pets.insert(&mut pet).await.unwrap();
        }

        let underscore = pets
            .retrieve(&PetSearchOptions::new().name("u_n"))
            .await
            .unwrap();
        assert_eq!(names(&underscore), vec!["Lu_na"]);

        let percent = pets
            .retrieve(&PetSearchOptions::new().name("t%"))
            .await
            .unwrap();
        assert_eq!(names(&percent), vec!["Cent%"]);

        let backslash = pets
            .retrieve(&PetSearchOptions::new().name("k\\s"))
            .await
            .unwrap();
        assert_eq!(names(&backslash), vec!["Back\\slash"]);
    }

    #[tokio::test]
    async fn test_owner_name_search_folds_non_ascii() {
        let (_db, _, owners) = setup().await;

        let mut asa = TestOwnerBuilder::new()
            .with_name("Åsa Ørn")
            .with_email("asa@example.com")
            .build();
        owners.insert(&mut asa).await.unwrap();
        let mut bruno = OwnerFixtures::bruno();
        owners.insert(&mut bruno).await.unwrap();

        let found = owners
            .retrieve(&OwnerSearchOptions::new().name("åsa ø"))
            .await
            .unwrap();
        assert_eq!(found, vec![asa]);
    }

    #[tokio::test]
    async fn test_filtered_results_are_a_stable_subset() {
        let (_db, pets, owners) = setup().await;
        seed(&pets, &owners).await;

        let options = PetSearchOptions::new().name("i");
        let first = pets.retrieve(&options).await.unwrap();
        let second = pets.retrieve(&options.clone()).await.unwrap();
        let all = pets.retrieve_all().await.unwrap();

        assert_eq!(first, second);
        assert_subset_by_id(&first, &all);
        assert_pets_in_default_order(&first);
        assert!(first.len() < all.len());
    }

    #[tokio::test]
    async fn test_owner_email_search_ignores_case() {
        let (_db, _, owners) = setup().await;

        let mut alice = OwnerFixtures::alice();
        owners.insert(&mut alice).await.unwrap();
        for n in 1..=3 {
            let mut owner = OwnerFixtures::numbered(n);
            owners.insert(&mut owner).await.unwrap();
        }

        let found = owners
            .retrieve(&OwnerSearchOptions::new().email(" Alice@Example.com "))
            .await
            .unwrap();
        assert_eq!(found, vec![alice]);

        let numbered = owners
            .retrieve(&OwnerSearchOptions::new().name("owner"))
            .await
            .unwrap();
        assert_eq!(numbered.len(), 3);
    }

    #[tokio::test]
    async fn test_find_by_microchip() {
        let (_db, pets, owners) = setup().await;
        let (_, stored) = seed(&pets, &owners).await;

        let found = pets
            .find_by_microchip(MicrochipFixtures::REX)
            .await
            .unwrap()
            .expect("Rex is chipped");
        assert_eq!(found, stored[0]);

        let missing = pets
            .find_by_microchip(&MicrochipFixtures::numbered(1))
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}

mod concurrency {
    use super::*;
    use futures::future::try_join_all;

    #[tokio::test]
    async fn test_concurrent_inserts_get_distinct_ids() {
        let (db, pets, _) = setup().await;

        let inserts = (0..20u32).map(|n| {
            let pets = pets.clone();
            async move {
                let mut pet = TestPetBuilder::new()
                    .with_name(format!("Pet {:02}", n))
                    .with_microchip(MicrochipFixtures::numbered(n))
                    .build();
                pets.insert(&mut pet).await.map(|_| pet)
            }
        });
        let inserted = try_join_all(inserts).await.unwrap();

        assert_ids_unique(&inserted);
        assert_eq!(db.count_rows("pets").await.unwrap(), 20);

        let all = pets.retrieve_all().await.unwrap();
        assert_eq!(all.len(), 20);
        assert_pets_in_default_order(&all);
    }

    #[tokio::test]
    async fn test_concurrent_duplicates_commit_exactly_one() {
        let (_db, pets, _) = setup().await;

        let attempts = (0..5).map(|n| {
            let pets = pets.clone();
            async move {
                let mut pet = PetFixtures::named(&format!("Twin {}", n), Species::Dog)
                    .with_microchip(MicrochipFixtures::REX)
                    .unwrap();
                pets.insert(&mut pet).await
            }
        });
        let results = futures::future::join_all(attempts).await;

        let committed = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(committed, 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(DatabaseError::is_unique_violation));
        assert_eq!(pets.retrieve_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reads_see_committed_writes_from_other_handles() {
        let (db, pets, _) = setup().await;
        let other = PetRepository::from_pool(db.pool().clone());

        let mut pet = PetFixtures::clover();
        pets.insert(&mut pet).await.unwrap();

        let seen = other.find(pet.id.unwrap()).await.unwrap().unwrap();
        assert_same_pet_data(&seen, &PetFixtures::clover());
    }
}
