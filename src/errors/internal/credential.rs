use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    /// Unknown identifier or wrong password; the two are never distinguished
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Account is pending approval")]
    PendingApproval,

    #[error("Invalid token: {reason}")]
    InvalidToken { reason: String },

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    /// Username shaped like an email address other than the account's own
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Password validation failed: {0}")]
    PasswordValidationFailed(String),

    #[error("User not found: {0}")]
    UserNotFound(String),
}

impl CredentialError {
    pub fn invalid_token(reason: impl Into<String>) -> Self {
        Self::InvalidToken {
            reason: reason.into(),
        }
    }
}
