//! Input checks shared by the form handlers

use common::{Error, Result};

/// Trimmed, non-empty, at most `max` characters
pub(crate) fn required_text(field: &str, value: &str, max: usize) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::Validation(format!("{} is required", field)));
    }
    if value.chars().count() > max {
        return Err(Error::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(value.to_string())
}

/// Blank input becomes None
pub(crate) fn optional_text(field: &str, value: Option<&str>, max: usize) -> Result<Option<String>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => required_text(field, v, max).map(Some),
        None => Ok(None),
    }
}

/// Lowercase snake_case keys for settings and point values
pub(crate) fn config_key(value: &str) -> Result<String> {
    let key = required_text("key", value, 100)?;
    if !key
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(Error::Validation(format!(
            "key '{}' may only contain a-z, 0-9 and _",
            key
        )));
    }
    Ok(key)
}
