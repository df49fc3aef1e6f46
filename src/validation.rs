// Validation utilities module
// Provides custom validation functions for domain-specific rules

use validator::ValidationError;

/// Validates a batch code: 3-20 characters, letters/digits/dashes only.
/// Codes are case-insensitive; handlers normalize them to uppercase.
pub fn validate_batch_code(code: &str) -> Result<(), ValidationError> {
    if code.len() < 3 || code.len() > 20 {
        return Err(ValidationError::new("batch_code_length"));
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ValidationError::new("batch_code_charset"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_batch_codes() {
        assert!(validate_batch_code("CS101").is_ok());
        assert!(validate_batch_code("cs101").is_ok());
        assert!(validate_batch_code("MATH-2024").is_ok());
    }

    #[test]
    fn test_invalid_batch_codes() {
        assert!(validate_batch_code("ab").is_err());
        assert!(validate_batch_code("has space").is_err());
        assert!(validate_batch_code("way-too-long-batch-code-here").is_err());
    }
}
