use crate::errors::internal::CredentialError;

/// Password and email policy checks applied at registration and reset
///
/// Validation layers:
/// - Length validation (8-128 characters)
/// - Email shape (single `@`, non-empty local and domain parts)
pub struct PasswordValidatorProvider {
    min_length: usize,
    max_length: usize,
}

impl PasswordValidatorProvider {
    /// Create a validator with the default 8-128 character length bounds
    pub fn new() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
        }
    }

    /// Validate a password against the length policy
    ///
    /// Length is counted in characters, not bytes.
    ///
    /// # Returns
    /// * `Ok(())` - Password is acceptable
    /// * `Err(PasswordValidationError)` - Password fails validation with specific reason
    pub fn validate(&self, password: &str) -> Result<(), PasswordValidationError> {
        let length = password.chars().count();
        if length < self.min_length {
            return Err(PasswordValidationError::TooShort(self.min_length));
        }
        if length > self.max_length {
            return Err(PasswordValidationError::TooLong(self.max_length));
        }
        if password.trim().is_empty() {
            return Err(PasswordValidationError::Blank);
        }

        Ok(())
    }

    /// Validate the shape of an email address
    ///
    /// Accepts the trimmed input when it has exactly one `@`, a non-empty
    /// local part and a domain part, and no whitespace.
    pub fn validate_email(&self, email: &str) -> Result<(), CredentialError> {
        let email = email.trim();
        let invalid = || CredentialError::InvalidEmail(email.to_string());

        if email.is_empty() || email.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        let mut parts = email.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        if local.is_empty() || domain.is_empty() {
            return Err(invalid());
        }

        Ok(())
    }
}

impl Default for PasswordValidatorProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during password validation
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PasswordValidationError {
    /// Password is shorter than the minimum required length
    #[error("Password must be at least {0} characters")]
    TooShort(usize),

    /// Password exceeds the maximum allowed length
    #[error("Password must not exceed {0} characters")]
    TooLong(usize),

    #[error("Password must not be blank")]
    Blank,
}

impl From<PasswordValidationError> for CredentialError {
    fn from(err: PasswordValidationError) -> Self {
        CredentialError::PasswordValidationFailed(err.to_string())
    }
}
