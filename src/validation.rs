//! Input validation shared by the record types.

use crate::Error;

/// Check that a name contains at least one letter or digit.
///
/// Whitespace-only and punctuation-only names are rejected; anything
/// with a single alphanumeric character is allowed.
///
/// # Errors
///
/// Returns [Error::InvalidName] with the offending input.
pub fn validate_name(name: &str) -> Result<(), Error> {
    if name.chars().any(|character| character.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}
