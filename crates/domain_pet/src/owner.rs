//! Owner entity

use core_kernel::{EntityId, Identifiable};
use serde::{Deserialize, Serialize};

use crate::error::PetError;
use crate::validation::{normalize_email, normalize_name};

/// A person responsible for one or more pets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: Option<EntityId>,
    pub name: String,
    /// Lowercased contact email, unique across owners
    pub email: String,
    pub phone: Option<String>,
}

impl Owner {
    /// Creates a new, not yet persisted owner
    pub fn new(name: &str, email: &str) -> Result<Self, PetError> {
        Ok(Self {
            id: None,
            name: normalize_name(name)?,
            email: normalize_email(email)?,
            phone: None,
        })
    }

    /// Sets the phone number
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Replaces the contact email
    pub fn change_email(&mut self, email: &str) -> Result<(), PetError> {
        self.email = normalize_email(email)?;
        Ok(())
    }
}

impl Identifiable for Owner {
    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }
}
