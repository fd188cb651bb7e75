//! Redirect validation.

use crate::error::CoreError;

/// Maximum length of a redirect source or target path.
pub const MAX_REDIRECT_PATH_LENGTH: usize = 2_048;

/// Permanent redirect.
pub const REDIRECT_PERMANENT: i16 = 301;
/// Temporary redirect.
pub const REDIRECT_TEMPORARY: i16 = 302;

/// Accepted redirect status codes.
pub const REDIRECT_TYPES: &[i16] = &[REDIRECT_PERMANENT, REDIRECT_TEMPORARY];

fn validate_path(field: &str, path: &str) -> Result<(), CoreError> {
    if !path.starts_with('/') {
        return Err(CoreError::Validation(format!(
            "{field} must start with '/' (got '{path}')"
        )));
    }
    if path.len() > MAX_REDIRECT_PATH_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {MAX_REDIRECT_PATH_LENGTH} characters"
        )));
    }
    if path.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(format!(
            "{field} must not contain whitespace"
        )));
    }
    Ok(())
}

/// Validate a redirect's paths and type.
pub fn validate_redirect(
    source_path: &str,
    target_path: &str,
    redirect_type: i16,
) -> Result<(), CoreError> {
    validate_path("source_path", source_path)?;
    validate_path("target_path", target_path)?;
    if source_path == target_path {
        return Err(CoreError::Validation(
            "source_path and target_path must differ".to_string(),
        ));
    }
    validate_redirect_type(redirect_type)
}

/// Validate a redirect status code.
pub fn validate_redirect_type(redirect_type: i16) -> Result<(), CoreError> {
    if !REDIRECT_TYPES.contains(&redirect_type) {
        return Err(CoreError::Validation(format!(
            "redirect_type must be 301 or 302 (got {redirect_type})"
        )));
    }
    Ok(())
}

/// Reject a redirect that would bounce straight back.
///
/// `target_redirect` is the existing redirect whose source equals the new
/// redirect's target, if any, given as its target path.
pub fn check_loop(source_path: &str, target_redirect: Option<&str>) -> Result<(), CoreError> {
    if target_redirect == Some(source_path) {
        return Err(CoreError::Validation(format!(
            "Redirect would loop: the target already redirects back to '{source_path}'"
        )));
    }
    Ok(())
}
