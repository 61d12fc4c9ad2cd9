mod bootstrap_settings;
pub mod database;
mod env_provider;
mod errors;
mod logging;
mod secret_config;
mod secret_manager;

pub use bootstrap_settings::BootstrapSettings;
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
#[cfg(test)]
pub use env_provider::MockEnvironment;
pub use errors::ConfigError;
pub use logging::{LoggingConfig, LoggingError, init_logging, init_logging_with};
pub use secret_config::{SecretConfig, SecretType};
pub use secret_manager::SecretManager;
