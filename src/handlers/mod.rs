pub mod posts;
pub mod profiles;
pub mod users;

use uuid::Uuid;

use crate::error::ApiError;

/// Validate a required field, taking ownership of the value. Pushes the
/// per-field message on absence or emptiness and returns an empty string the
/// caller must not use until it has checked `errors`.
pub(crate) fn non_empty(value: Option<String>, message: &str, errors: &mut Vec<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            errors.push(message.to_string());
            String::new()
        }
    }
}

/// Presence-only check for fields the caller reads from a patch later.
pub(crate) fn require_present(value: &Option<String>, message: &str, errors: &mut Vec<String>) {
    match value {
        Some(v) if !v.trim().is_empty() => {}
        _ => errors.push(message.to_string()),
    }
}

/// Parse a path id. Malformed ids map to the same not-found outcome as
/// well-formed ids that match nothing.
pub(crate) fn parse_id(raw: &str, not_found_message: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::not_found(not_found_message))
}
