//! Integer identifiers for persisted entities
//!
//! Identifiers are assigned by the storage engine when an entity is first
//! inserted and never change afterwards. Only strictly positive values are
//! valid, which matches the rowids handed out by the database.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a value cannot be used as an entity identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidEntityId {
    #[error("identifier must be positive, got {0}")]
    NotPositive(i64),

    #[error("identifier is not an integer: '{0}'")]
    Malformed(String),
}

/// Unique identifier of a stored entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct EntityId(i64);

impl EntityId {
    /// Creates an identifier, rejecting zero and negative values
    pub fn new(value: i64) -> Result<Self, InvalidEntityId> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(InvalidEntityId::NotPositive(value))
        }
    }

    /// Returns the raw integer value
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = InvalidEntityId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| InvalidEntityId::Malformed(s.to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<i64> for EntityId {
    type Error = InvalidEntityId;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityId> for i64 {
    fn from(id: EntityId) -> i64 {
        id.0
    }
}
