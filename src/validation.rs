//! Checks shared by the user and transaction text fields.

use crate::Error;

/// The longest username allowed.
pub const USERNAME_MAX_LENGTH: usize = 50;
/// The longest email address allowed.
pub const EMAIL_MAX_LENGTH: usize = 100;
/// The longest category name allowed.
pub const CATEGORY_MAX_LENGTH: usize = 50;
/// The longest transaction description allowed.
pub const DESCRIPTION_MAX_LENGTH: usize = 255;

/// Trim `value` and check that it is non-empty and at most `max_length` characters.
///
/// # Errors
///
/// Returns [Error::EmptyField] if `value` is empty or only whitespace, or
/// [Error::FieldTooLong] if the trimmed value is longer than `max_length` characters.
pub fn validate_text(field: &'static str, value: &str, max_length: usize) -> Result<String, Error> {
    let value = value.trim();

    if value.is_empty() {
        Err(Error::EmptyField(field))
    } else if value.chars().count() > max_length {
        Err(Error::FieldTooLong { field, max_length })
    } else {
        Ok(value.to_string())
    }
}

/// Unwrap a required request field, treating an empty string as missing.
///
/// # Errors
///
/// Returns [Error::MissingFields] if `value` is `None` or an empty string.
pub fn require(value: Option<String>) -> Result<String, Error> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::MissingFields),
    }
}
