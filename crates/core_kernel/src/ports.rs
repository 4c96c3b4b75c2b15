//! Ports and Adapters Infrastructure
//!
//! This module defines the repository port every entity is accessed through.
//! Application code depends on the trait; storage adapters implement it.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Application Layer                        │
//! │            (depends on Repository<E, O> only)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Repository<E, O> port                       │
//! │   insert / update / delete / find / retrieve_all / retrieve  │
//! └─────────────────────────────────────────────────────────────┘
//!                              ▲
//!                              │
//!               ┌──────────────┴──────────────┐
//!               │  GenericRepository (infra_db) │
//!               │  one instance per entity type │
//!               └───────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use core_kernel::Repository;
//!
//! async fn rename<R: Repository<Pet, PetSearchOptions>>(repo: &R, id: EntityId) -> Result<(), R::Error> {
//!     if let Some(mut pet) = repo.find(id).await? {
//!         pet.rename("Max")?;
//!         repo.update(&pet).await?;
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;

use crate::entity::Identifiable;
use crate::identifiers::EntityId;

/// Marker trait for all domain ports
///
/// All port implementations must be thread-safe so a single instance can be
/// shared across tasks.
pub trait DomainPort: Send + Sync + 'static {}

/// CRUD access to one entity type
///
/// `E` is the entity and `O` the entity-specific search options value used by
/// [`Repository::retrieve`]. Every operation is self-contained: it acquires its
/// own connection, and mutating operations run in their own transaction.
#[async_trait]
pub trait Repository<E, O>: DomainPort
where
    E: Identifiable + Send + Sync + 'static,
    O: Send + Sync + 'static,
{
    /// Error type reported by the adapter
    type Error: std::error::Error + Send + Sync + 'static;

    /// Stores a new entity and assigns the generated identifier to it
    async fn insert(&self, entity: &mut E) -> Result<(), Self::Error>;

    /// Writes the state of an already persisted entity
    async fn update(&self, entity: &E) -> Result<(), Self::Error>;

    /// Removes the entity with the given identifier
    async fn delete(&self, id: EntityId) -> Result<(), Self::Error>;

    /// Loads an entity by identifier, `None` if it does not exist
    async fn find(&self, id: EntityId) -> Result<Option<E>, Self::Error>;

    /// Loads every entity in the adapter's default order
    async fn retrieve_all(&self) -> Result<Vec<E>, Self::Error>;

    /// Loads the entities matching `options`, in the adapter's default order
    async fn retrieve(&self, options: &O) -> Result<Vec<E>, Self::Error>;
}
