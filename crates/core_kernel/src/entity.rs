//! The entity contract
//!
//! Anything the generic repository stores must be able to report its
//! identifier. Nothing else is required of an entity at this level; table
//! layout and row mapping belong to the storage adapter.

use crate::identifiers::EntityId;

/// A record type with a unique integer identity
///
/// The identifier is `None` until the entity has been inserted. Storage
/// adapters call [`Identifiable::assign_id`] once the engine has generated
/// the identifier, so the caller's value carries it from then on.
pub trait Identifiable {
    /// Returns the identifier, if the entity has been persisted
    fn id(&self) -> Option<EntityId>;

    /// Records the identifier assigned by the storage engine
    fn assign_id(&mut self, id: EntityId);

    /// Returns true once the entity has an identifier
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}
