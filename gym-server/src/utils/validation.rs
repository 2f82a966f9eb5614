//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use super::AppError;

/// Class titles, trainer names
pub const MAX_NAME_LEN: usize = 200;

/// Class descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Member identifiers
pub const MAX_MEMBER_ID_LEN: usize = 64;

/// Longest class, in minutes
pub const MAX_DURATION_MINUTES: i64 = 24 * 60;

/// Largest class capacity
pub const MAX_CAPACITY: i64 = 10_000;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an integer lies in `min..=max`.
pub fn validate_range(value: i64, field: &str, min: i64, max: i64) -> Result<(), AppError> {
    if value < min || value > max {
        return Err(AppError::validation(format!(
            "{field} must be between {min} and {max} (got {value})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Trim a member id and check it is usable as a booking key
pub fn normalize_member_id(member_id: &str) -> Result<&str, AppError> {
    let trimmed = member_id.trim();
    validate_required_text(trimmed, "member_id", MAX_MEMBER_ID_LEN)?;
    Ok(trimmed)
}
