//! Infrastructure Database Layer
//!
//! This crate persists domain entities in SQLite using SQLx. A single
//! [`GenericRepository`] provides create, read, update, delete and search for
//! every entity that implements [`EntityMapping`]; entity-specific filtering
//! and ordering are plugged in through [`SearchCriteria`].
//!
//! # Architecture
//!
//! - [`pool`] / [`config`]: connection pool and its settings
//! - [`session`]: pooled connections and transactional units of work
//! - [`criteria`]: predicates and sort orders rendered as bound SQL
//! - [`mapping`]: how an entity maps onto its table
//! - [`generic`]: the repository itself
//! - [`repositories`]: mappings and criteria for the pet care entities
//!
//! # Example
//!
//! ```rust,ignore
//! use core_kernel::Repository;
//! use domain_pet::{Pet, PetSearchOptions, Species};
//! use infra_db::{create_pool_from_url, PetRepository};
//!
//! let pool = create_pool_from_url("sqlite://pets.db").await?;
//! let pets = PetRepository::from_pool(pool);
//!
//! let mut rex = Pet::new("Rex", Species::Dog)?;
//! pets.insert(&mut rex).await?;
//!
//! let dogs = pets.retrieve(&PetSearchOptions::new().species(Species::Dog)).await?;
//! ```

pub mod config;
pub mod criteria;
pub mod error;
pub mod generic;
pub mod mapping;
pub mod pool;
pub mod repositories;
pub mod session;

pub use config::DatabaseSettings;
pub use criteria::{to_like_parameter, OrderBy, Predicate, Root, SqlValue};
pub use error::DatabaseError;
pub use generic::{GenericRepository, SearchCriteria};
pub use mapping::EntityMapping;
pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use repositories::{OwnerCriteria, OwnerRepository, PetCriteria, PetRepository};
pub use session::{Session, SessionFactory, UnitOfWork};
