use std::fmt;

use crate::config::{ConfigError, EnvironmentProvider, SecretConfig, SecretType, SystemEnvironment};

/// Centralized manager for application secrets
pub struct SecretManager {
    password_pepper: String,
}

impl SecretManager {
    /// Initialize the SecretManager from the process environment
    ///
    /// # Errors
    /// Returns `ConfigError` if any required secret is missing or fails validation
    pub fn init() -> Result<Self, ConfigError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    /// Initialize the SecretManager from the given environment provider
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let password_pepper = Self::load_secret(env, &Self::pepper_config())?;

        Ok(Self { password_pepper })
    }

    /// Create a SecretManager with an explicit pepper (tests and embedding)
    pub fn with_pepper(password_pepper: impl Into<String>) -> Self {
        Self {
            password_pepper: password_pepper.into(),
        }
    }

    /// Configuration for the password pepper
    fn pepper_config() -> SecretConfig {
        SecretConfig::new(SecretType::EnvVar {
            name: "PASSWORD_PEPPER".to_string(),
        })
        .required(true)
        .min_length(16)
    }

    /// Get the pepper used as the Argon2 secret parameter
    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    /// Load a secret based on its configuration
    pub(crate) fn load_secret(
        env: &dyn EnvironmentProvider,
        config: &SecretConfig,
    ) -> Result<String, ConfigError> {
        let name = config.secret_type.name();
        let value = match &config.secret_type {
            SecretType::EnvVar { name } => match env.get_var(name) {
                Some(v) => v,
                None if !config.required => return Ok(String::new()),
                None => return Err(ConfigError::missing_secret(name)),
            },
        };

        if let Some(min_len) = config.min_length {
            if value.len() < min_len {
                return Err(ConfigError::invalid_secret_length(name, min_len, value.len()));
            }
        }

        Ok(value)
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 1 }}")
    }
}
