//! Connection pool setup.
//!
//! The URL scheme picks the driver: production points it at MySQL, tests at
//! an in-memory `SQLite` database. Each backend keeps its concrete pool so
//! rows are decoded by the driver that produced them. Sessions borrow one
//! pooled connection per request (see [`crate::session`]).

use sqlx::ConnectOptions;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::error::StorageError;
use crate::session::SqlxStore;

/// Environment variables that make up the MySQL connection.
pub const MYSQL_ENV_VARS: [&str; 5] = [
    "MYSQL_USER",
    "MYSQL_PASSWORD",
    "MYSQL_HOST",
    "MYSQL_PORT",
    "MYSQL_DATABASE",
];

/// Configuration for the storage adapter.
#[derive(Debug, Clone)]
pub struct Config {
    /// sqlx connection URL (e.g. `mysql://user:pw@host:3306/db` or
    /// `sqlite::memory:`). `mariadb://` is accepted as an alias of `mysql://`.
    pub database_url: String,
    /// Upper bound on simultaneously open connections.
    pub max_connections: u32,
}

impl Config {
    /// Default pool size.
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

    /// Configuration for a private in-memory `SQLite` database.
    ///
    /// Uses a single connection: every new `SQLite` memory connection would
    /// otherwise open its own empty database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }

    /// Build a [`Database`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the URL names another driver, is invalid,
    /// or the first connection cannot be established.
    pub async fn build(self) -> Result<Database, StorageError> {
        Database::initialize(&self).await
    }
}

/// MySQL connection parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct MySqlSettings {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl std::fmt::Debug for MySqlSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlSettings")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .finish()
    }
}

/// Why [`MySqlSettings`] could not be assembled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MySqlSettingsError {
    /// One or more variables are unset.
    #[error("missing environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    /// `MYSQL_PORT` is not a valid port number.
    #[error("MYSQL_PORT is not a valid port: {0:?}")]
    InvalidPort(String),
}

impl MySqlSettings {
    /// Read `MYSQL_USER`, `MYSQL_PASSWORD`, `MYSQL_HOST`, `MYSQL_PORT` and
    /// `MYSQL_DATABASE` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`MySqlSettingsError`] naming every absent variable, or the
    /// unparsable port.
    pub fn from_env() -> Result<Self, MySqlSettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Assemble settings from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`MySqlSettings::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MySqlSettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing: Vec<&'static str> = MYSQL_ENV_VARS
            .into_iter()
            .filter(|name| lookup(*name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(MySqlSettingsError::Missing(missing));
        }

        let value = |name: &str| lookup(name).unwrap_or_default();
        let raw_port = value("MYSQL_PORT");
        let port = raw_port
            .trim()
            .parse()
            .map_err(|_| MySqlSettingsError::InvalidPort(raw_port.clone()))?;

        Ok(Self {
            user: value("MYSQL_USER"),
            password: value("MYSQL_PASSWORD"),
            host: value("MYSQL_HOST"),
            port,
            database: value("MYSQL_DATABASE"),
        })
    }

    /// sqlx connection URL with credentials percent-encoded.
    #[must_use]
    pub fn database_url(&self) -> String {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .to_url_lossy()
            .to_string()
    }
}

/// A connection pool for one of the supported drivers.
#[derive(Debug, Clone)]
pub(crate) enum Pool {
    MySql(MySqlPool),
    Sqlite(SqlitePool),
}

/// Holds the connection pool.
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Open the pool for the driver named by the URL scheme.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the scheme is unsupported or the
    /// connection fails.
    async fn initialize(config: &Config) -> Result<Self, StorageError> {
        let scheme = config
            .database_url
            .split_once(':')
            .map_or(config.database_url.as_str(), |(scheme, _)| scheme);

        let pool = match scheme {
            "mysql" | "mariadb" => Pool::MySql(
                MySqlPoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect(&config.database_url)
                    .await?,
            ),
            "sqlite" => Pool::Sqlite(
                SqlitePoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect(&config.database_url)
                    .await?,
            ),
            other => return Err(StorageError::UnsupportedScheme(other.to_string())),
        };

        tracing::info!(
            driver = scheme,
            max_connections = config.max_connections,
            "relational store connected"
        );
        Ok(Self { pool })
    }

    /// The `SQLite` pool, when this database runs on `SQLite`.
    #[cfg(any(test, feature = "fixtures"))]
    pub(crate) fn sqlite(&self) -> Option<&SqlitePool> {
        match &self.pool {
            Pool::Sqlite(pool) => Some(pool),
            Pool::MySql(_) => None,
        }
    }

    /// Store handle implementing the application's store port.
    #[must_use]
    pub fn store(&self) -> SqlxStore {
        SqlxStore::new(self.pool.clone())
    }
}
