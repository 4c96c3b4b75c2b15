//! Repositories for the pet care entities
//!
//! Each module maps one entity onto its table and supplies the criteria the
//! generic repository uses to filter and order it. The repositories
//! themselves are aliases of [`GenericRepository`](crate::GenericRepository).

pub mod owner;
pub mod pet;

pub use owner::{OwnerCriteria, OwnerRepository, OwnerRow};
pub use pet::{PetCriteria, PetRepository, PetRow};
