//! Request field validation helpers

use crate::api::error::{ApiError, ApiResult};

/// A present, non-blank string field
pub fn require_text(value: Option<String>, field_name: &str) -> ApiResult<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::ValidationError(format!("{} is required", field_name))),
    }
}

/// Validate string length constraints (in characters)
pub fn validate_string_length(value: &str, field_name: &str, min: usize, max: usize) -> ApiResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ApiError::ValidationError(format!(
            "{} must be between {} and {} characters",
            field_name, min, max
        )));
    }
    Ok(())
}
