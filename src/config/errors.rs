use thiserror::Error;

/// Errors raised while loading startup configuration and secrets
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Required secret '{secret_name}' is missing")]
    MissingSecret { secret_name: String },

    #[error("Secret '{secret_name}' must be at least {expected} characters, got {actual}")]
    InvalidSecretLength {
        secret_name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Setting '{setting_name}' has invalid format. Expected: {expected}, got: {actual}")]
    InvalidFormat {
        setting_name: String,
        expected: String,
        actual: String,
    },
}

impl ConfigError {
    pub fn missing_secret(secret_name: &str) -> Self {
        Self::MissingSecret {
            secret_name: secret_name.to_string(),
        }
    }

    pub fn invalid_secret_length(secret_name: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidSecretLength {
            secret_name: secret_name.to_string(),
            expected,
            actual,
        }
    }

    pub fn invalid_format(setting_name: &str, expected: &str, actual: &str) -> Self {
        Self::InvalidFormat {
            setting_name: setting_name.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}
