//! Storage-specific error type wrapping sqlx errors.

use firewatch_domain::error::HubError;

/// Errors originating from the relational store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A connection, query or row decoding failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// The connection URL names a driver this adapter does not ship.
    #[error("unsupported database url scheme `{0}`")]
    UnsupportedScheme(String),
}

impl From<StorageError> for HubError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
