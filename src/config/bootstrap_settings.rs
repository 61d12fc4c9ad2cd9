use std::fmt;

use crate::config::{ConfigError, EnvironmentProvider, SystemEnvironment};

const DEFAULT_DATABASE_URL: &str = "sqlite://medixscan.db?mode=rwc";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

/// Bootstrap settings for infrastructure configuration
///
/// Loaded once at startup, before the database is reachable.
pub struct BootstrapSettings {
    database_url: String,
    server_host: String,
    server_port: u16,
    public_url: String,
}

impl BootstrapSettings {
    /// Load bootstrap settings from the given environment provider
    ///
    /// | Variable       | Default                          |
    /// |----------------|----------------------------------|
    /// | `DATABASE_URL` | `sqlite://medixscan.db?mode=rwc` |
    /// | `HOST`         | `0.0.0.0`                        |
    /// | `PORT`         | `8000`                           |
    /// | `PUBLIC_URL`   | `http://localhost:<PORT>`        |
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let database_url = non_empty(env, "DATABASE_URL")
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let server_host = non_empty(env, "HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        if server_host.contains(char::is_whitespace) {
            return Err(ConfigError::invalid_format("HOST", "host name or IP address", &server_host));
        }

        let server_port = match non_empty(env, "PORT") {
            Some(value) => Self::parse_port(&value)?,
            None => DEFAULT_PORT,
        };

        let public_url = non_empty(env, "PUBLIC_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", server_port))
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            database_url,
            server_host,
            server_port,
            public_url,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    fn parse_port(value: &str) -> Result<u16, ConfigError> {
        match value.parse::<u16>() {
            Ok(port) if port > 0 => Ok(port),
            _ => Err(ConfigError::invalid_format("PORT", "integer between 1 and 65535", value)),
        }
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    /// Address the listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Externally reachable base URL, advertised in the OpenAPI document
    pub fn public_url(&self) -> &str {
        &self.public_url
    }
}

fn non_empty(env: &dyn EnvironmentProvider, key: &str) -> Option<String> {
    env.get_var(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Database URLs may embed credentials
        f.debug_struct("BootstrapSettings")
            .field("database_url", &"<redacted>")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("public_url", &self.public_url)
            .finish()
    }
}
