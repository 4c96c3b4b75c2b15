//! Pet Care Domain
//!
//! This crate holds the entities of the pet care system and the search
//! options used to filter them. Entities are plain values; persistence is
//! handled by the generic repository in `infra_db`.
//!
//! # Examples
//!
//! ```rust
//! use domain_pet::{Pet, Species, PetSearchOptions};
//!
//! let pet = Pet::new("Rex", Species::Dog).unwrap().with_breed("Beagle");
//! assert!(pet.id.is_none());
//!
//! let options = PetSearchOptions::new().name("re").species(Species::Dog);
//! assert!(!options.is_empty());
//! ```

pub mod pet;
pub mod owner;
pub mod search;
pub mod error;
mod validation;

pub use pet::{Pet, Species};
pub use owner::Owner;
pub use search::{PetSearchOptions, OwnerSearchOptions};
pub use error::PetError;
