// Validation utilities module
// Custom validation functions used by the request DTOs

use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

static USERNAME_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Validates that a username contains only letters, digits, underscores and
/// hyphens. Length bounds are enforced separately on the DTO.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let pattern =
        USERNAME_PATTERN.get_or_init(|| Regex::new("^[a-zA-Z0-9_-]+$").expect("valid pattern"));

    if pattern.is_match(username) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_username"))
    }
}
