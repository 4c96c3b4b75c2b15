//! Core Kernel - Foundational types shared by every persisted entity
//!
//! This crate provides the building blocks the data-access layer is written against:
//! - Integer entity identifiers
//! - The `Identifiable` entity contract
//! - The generic `Repository` port implemented by storage adapters

pub mod identifiers;
pub mod entity;
pub mod ports;
pub mod error;

pub use identifiers::{EntityId, InvalidEntityId};
pub use entity::Identifiable;
pub use ports::{DomainPort, Repository};
pub use error::CoreError;
