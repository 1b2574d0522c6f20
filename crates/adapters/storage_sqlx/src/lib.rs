//! # firewatch-adapter-storage-sqlx
//!
//! Relational store adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the store port traits defined in `firewatch-app::ports::store`
//! - Manage the connection pool lifecycle (MySQL in production, `SQLite` in tests)
//! - Assemble the MySQL connection URL from `MYSQL_*` environment variables
//! - Map between database rows and domain types
//!
//! ## Dependency rule
//! Depends on `firewatch-app` (for port traits) and `firewatch-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod pool;
mod row;
mod session;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use error::StorageError;
pub use pool::{Config, Database, MYSQL_ENV_VARS, MySqlSettings, MySqlSettingsError};
pub use session::{SqlxSession, SqlxStore};
