// Validation utilities for string fields

/// Trim a string field, rejecting empty values when the field is required.
pub fn trim_and_validate_field(field: &str, required: bool) -> Result<String, String> {
    let trimmed = field.trim().to_string();
    if trimmed.is_empty() {
        if required {
            Err("Field cannot be empty".to_string())
        } else {
            Ok(trimmed)
        }
    } else {
        Ok(trimmed)
    }
}

/// Normalize an email address for lookup and storage: trimmed, lowercased.
///
/// Returns `None` for values that cannot be an address at all. Callers
/// decide how that surfaces (login treats it as a failed credential,
/// registration as a validation error).
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return None;
    }
    Some(normalized)
}
