use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{EnvironmentProvider, SystemEnvironment};

/// Configuration for application logging
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_level: String,
    pub app_log_file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Load logging configuration (`LOG_LEVEL`, `APP_LOG_FILE`)
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Self {
        let log_level = env
            .get_var("LOG_LEVEL")
            .unwrap_or_else(|| "info,sqlx=warn".to_string());

        let app_log_file = env
            .get_var("APP_LOG_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Self {
            log_level,
            app_log_file,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize logging: {0}")]
    InitializationError(String),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("File system error: {0}")]
    FileSystemError(#[from] std::io::Error),
}

/// Initialize the tracing subscriber with console and optional file output
/// Reads configuration from environment variables automatically
pub fn init_logging() -> Result<(), LoggingError> {
    init_logging_with(&LoggingConfig::from_env_provider(&SystemEnvironment))
}

pub fn init_logging_with(config: &LoggingConfig) -> Result<(), LoggingError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| LoggingError::InvalidLogLevel(format!("{}: {}", config.log_level, e)))?;

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter.clone());

    let subscriber = tracing_subscriber::registry().with(console_layer);

    if let Some(log_file_path) = &config.app_log_file {
        let directory = log_file_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(directory)?;

        let file_name = log_file_path
            .file_name()
            .ok_or_else(|| LoggingError::InitializationError("Invalid log file path".to_string()))?;

        // Daily rotation; old files are left for external retention tooling
        let file_appender = tracing_appender::rolling::daily(directory, file_name);

        let file_layer = fmt::layer()
            .with_writer(file_appender)
            .with_target(true)
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
            .with_filter(env_filter);

        subscriber
            .with(file_layer)
            .try_init()
            .map_err(|e| LoggingError::InitializationError(e.to_string()))?;
    } else {
        subscriber
            .try_init()
            .map_err(|e| LoggingError::InitializationError(e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_default_logging_config() {
        let config = LoggingConfig::from_env_provider(&MockEnvironment::empty());
        assert_eq!(config.log_level, "info,sqlx=warn");
        assert!(config.app_log_file.is_none());
    }

    #[test]
    fn test_logging_config_from_environment() {
        let env = MockEnvironment::empty()
            .with_var("LOG_LEVEL", "debug")
            .with_var("APP_LOG_FILE", "logs/medixscan.log");

        let config = LoggingConfig::from_env_provider(&env);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.app_log_file, Some(PathBuf::from("logs/medixscan.log")));
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        let config = LoggingConfig {
            log_level: "not a [valid filter".to_string(),
            app_log_file: None,
        };

        let result = init_logging_with(&config);
        assert!(matches!(result, Err(LoggingError::InvalidLogLevel(_))));
    }
}
