//! # Validation Utilities
//!
//! Input validation helpers.

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate that a string looks like an http(s) URL.
pub fn validate_http_url(value: &str, field_name: &str) -> Result<(), String> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(format!("{} must be an http(s) URL", field_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("x", "field").is_ok());
        assert!(validate_not_empty("  ", "field").is_err());
    }

    #[test]
    fn test_validate_http_url() {
        assert!(validate_http_url("https://example.com", "url").is_ok());
        assert!(validate_http_url("http://localhost:8000/", "url").is_ok());
        assert!(validate_http_url("ftp://example.com", "url").is_err());
    }
}
