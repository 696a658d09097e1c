//! Paste password validation.

use crate::error::{KlistraError, Result};

/// Maximum password length in characters.
pub const MAX_PASSWORD_LENGTH: usize = 100;

/// Validate the password supplied with a create request.
///
/// # Requirements
///
/// - At most 100 characters
/// - Not empty when the paste is protected; whitespace counts as content
///
/// Unprotected pastes ignore the password, so only the length limit applies.
///
/// # Examples
///
/// ```
/// use klistra_core::crypto::validate_password;
///
/// assert!(validate_password("secret1", true).is_ok());
/// assert!(validate_password("", false).is_ok());
/// assert!(validate_password("", true).is_err());
/// ```
pub fn validate_password(password: &str, protect: bool) -> Result<()> {
    if protect && password.is_empty() {
        return Err(KlistraError::InvalidInput(
            "Password is required for a protected paste".to_string(),
        ));
    }

    let length = password.chars().count();
    if length > MAX_PASSWORD_LENGTH {
        return Err(KlistraError::InvalidInput(format!(
            "Password must be at most {} characters (got {})",
            MAX_PASSWORD_LENGTH, length
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_passwords() {
        assert!(validate_password("secret1", true).is_ok());
        assert!(validate_password("x", true).is_ok());
        assert!(validate_password("with spaces and symbols!@#", true).is_ok());
    }

    #[test]
    fn test_protected_requires_password() {
        assert!(validate_password("", true).is_err());
    }

    #[test]
    fn test_whitespace_password_is_accepted() {
        assert!(validate_password("   ", true).is_ok());
        assert!(validate_password("\n\t", true).is_ok());
    }

    #[test]
    fn test_unprotected_allows_empty() {
        assert!(validate_password("", false).is_ok());
    }

    #[test]
    fn test_password_too_long() {
        let exactly_max = "a".repeat(MAX_PASSWORD_LENGTH);
        assert!(validate_password(&exactly_max, true).is_ok());

        let too_long = "a".repeat(MAX_PASSWORD_LENGTH + 1);
        let err = validate_password(&too_long, false).unwrap_err();
        assert!(err.to_string().contains("at most 100 characters"));
    }
}
