//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `firewatch.toml` in the working directory, or at the path named
//! by `FIREWATCH_CONFIG`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use serde::Deserialize;

use firewatch_adapter_storage_sqlx::{Config as StoreConfig, MySqlSettings, MySqlSettingsError};
use firewatch_domain::messages::MessageCatalog;

const DEFAULT_PATH: &str = "firewatch.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Relational store settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Texts returned to clients.
    pub messages: MessageCatalog,
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

/// Relational store configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `mysql://`, `mariadb://` or `sqlite:` connection URL. When unset, the
    /// URL is assembled from the `MYSQL_*` environment variables.
    pub url: Option<String>,
    /// Pool size.
    pub max_connections: u32,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `firewatch.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("FIREWATCH_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
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

    fn apply_env_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("FIREWATCH_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("FIREWATCH_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Some(val) = var("FIREWATCH_DATABASE_URL") {
            self.database.url = Some(val);
        }
        if let Some(val) = var("FIREWATCH_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "max_connections must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Store configuration, reading the `MYSQL_*` variables when no URL is
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Database`] naming the absent variables.
    pub fn store(&self) -> Result<StoreConfig, ConfigError> {
        self.store_with(MySqlSettings::from_env)
    }

    fn store_with<F>(&self, mysql: F) -> Result<StoreConfig, ConfigError>
    where
        F: FnOnce() -> Result<MySqlSettings, MySqlSettingsError>,
    {
        let database_url = match &self.database.url {
            Some(url) => url.clone(),
            None => mysql()?.database_url(),
        };
        Ok(StoreConfig {
            database_url,
            max_connections: self.database.max_connections,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: StoreConfig::DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "firewatchd=info,firewatch=info,tower_http=debug".to_string(),
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
    /// The store connection cannot be assembled.
    #[error("database connection is not configured: {0}")]
    Database(#[from] MySqlSettingsError),
}
