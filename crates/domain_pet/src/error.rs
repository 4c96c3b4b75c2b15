//! Pet domain errors

use core_kernel::CoreError;
use thiserror::Error;

/// Errors raised when building or changing pet domain values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PetError {
    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Unknown species: {0}")]
    UnknownSpecies(String),

    #[error("Invalid microchip number: {0}")]
    InvalidMicrochip(String),
}

impl PetError {
    /// Returns true if the error concerns a name field
    pub fn is_invalid_name(&self) -> bool {
        matches!(self, PetError::InvalidName(_))
    }
}

impl From<PetError> for CoreError {
    fn from(error: PetError) -> Self {
        CoreError::Validation(error.to_string())
    }
}
