//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `camguard.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use camguard_adapter_storage_sqlite_sqlx::RetryPolicy;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
    /// Seconds to wait between two connection attempts at startup.
    pub connect_retry_delay_secs: u64,
    /// Give up after this many attempts; unset retries forever.
    pub connect_max_attempts: Option<u32>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `camguard.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("camguard.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("CAMGUARD_HOST") {
            self.server.host = val;
        }
        if let Some(port) = lookup("CAMGUARD_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = lookup("CAMGUARD_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = lookup("CAMGUARD_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(secs) =
            lookup("CAMGUARD_CONNECT_RETRY_DELAY_SECS").and_then(|val| val.parse().ok())
        {
            self.database.connect_retry_delay_secs = secs;
        }
        if let Some(attempts) =
            lookup("CAMGUARD_CONNECT_MAX_ATTEMPTS").and_then(|val| val.parse().ok())
        {
            self.database.connect_max_attempts = Some(attempts);
        }
        if let Some(val) = lookup("CAMGUARD_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.database.connect_max_attempts == Some(0) {
            return Err(ConfigError::Validation(
                "connect_max_attempts must be non-zero when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Startup connection retry policy.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        let delay = Duration::from_secs(self.database.connect_retry_delay_secs);
        match self.database.connect_max_attempts {
            Some(max) => RetryPolicy::bounded(max, delay),
            None => RetryPolicy::unbounded(delay),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5005,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:camguard.db?mode=rwc".to_string(),
            connect_retry_delay_secs: 5,
            connect_max_attempts: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "camguardd=info,camguard=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5005);
        assert_eq!(config.database.url, "sqlite:camguard.db?mode=rwc");
        assert_eq!(config.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 5005);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:test.db'
            connect_retry_delay_secs = 2
            connect_max_attempts = 4

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(
            config.retry_policy(),
            RetryPolicy::bounded(4, Duration::from_secs(2))
        );
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 5005);
    }

    #[test]
    fn should_apply_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("CAMGUARD_PORT", "8080"),
            ("CAMGUARD_DATABASE_URL", "sqlite::memory:"),
            ("CAMGUARD_CONNECT_MAX_ATTEMPTS", "3"),
            ("CAMGUARD_LOG", "warn"),
        ]));

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database_url(), "sqlite::memory:");
        assert_eq!(config.database.connect_max_attempts, Some(3));
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn should_let_bind_override_host_and_port() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("CAMGUARD_PORT", "8080"), ("CAMGUARD_BIND", "127.0.0.1:9000")]));
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
    }

    #[test]
    fn should_prefer_rust_log_over_camguard_log() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("CAMGUARD_LOG", "warn"), ("RUST_LOG", "trace")]));
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_ignore_unparsable_port_override() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("CAMGUARD_PORT", "http")]));
        assert_eq!(config.server.port, 5005);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_connect_attempts() {
        let mut config = Config::default();
        config.database.connect_max_attempts = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_format_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:5005");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
