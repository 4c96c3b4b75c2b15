//! Field validation shared by the pet domain entities

use crate::error::PetError;

/// Maximum length accepted for any display name
pub(crate) const MAX_NAME_LEN: usize = 100;

/// Length of an ISO 11784 microchip number
pub(crate) const MICROCHIP_LEN: usize = 15;

/// Trims and checks a display name
pub(crate) fn normalize_name(name: &str) -> Result<String, PetError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PetError::InvalidName("name cannot be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(PetError::InvalidName(format!(
            "name cannot exceed {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}

/// Trims, lowercases and checks an email address
pub(crate) fn normalize_email(email: &str) -> Result<String, PetError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if valid {
        Ok(email)
    } else {
        Err(PetError::InvalidEmail(email))
    }
}

/// Checks a microchip number: exactly 15 ASCII digits
pub(crate) fn validate_microchip(number: &str) -> Result<String, PetError> {
    let number = number.trim();
    if number.len() == MICROCHIP_LEN && number.bytes().all(|b| b.is_ascii_digit()) {
        Ok(number.to_string())
    } else {
        Err(PetError::InvalidMicrochip(number.to_string()))
    }
}
