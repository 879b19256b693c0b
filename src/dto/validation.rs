//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest accepted board or player name.
pub const MAX_NAME_LENGTH: usize = 64;

/// Validates that a board or player name is present, not blank, and reasonably short.
///
/// # Examples
///
/// ```ignore
/// validate_name("board-1") // Ok
/// validate_name("   ")     // Err - blank
/// ```
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("name_blank");
        err.message = Some("Name must not be blank".into());
        return Err(err);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        let mut err = ValidationError::new("name_length");
        err.message = Some(
            format!(
                "Name must be at most {MAX_NAME_LENGTH} characters (got {})",
                name.chars().count()
            )
            .into(),
        );
        return Err(err);
    }

    Ok(())
}
