//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`HubError`]
//! via `#[from]`. Adapters box their own error types into
//! [`HubError::Storage`].

use crate::id::FloorId;

/// Top-level error returned by application services.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// The request was malformed or incomplete.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced row does not exist in the store.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The store could not be reached or a statement failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A request that cannot be processed as sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The body is not a JSON object.
    #[error("request body must be a JSON object")]
    MalformedBody,

    /// Required fields are absent, in canonical order.
    #[error("missing fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// A field holds an array or an object, which no column can store.
    #[error("invalid value for field `{field}`")]
    InvalidField { field: &'static str },

    /// The query parameters match no read mode.
    #[error("invalid request")]
    InvalidRequest,
}

/// A referenced row is absent. Lookup keys are kept as the client sent
/// them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundError {
    #[error("no jacket with uuid `{uuid}`")]
    Jacket { uuid: String },

    #[error("building {building_id} has no floor {floor_number}")]
    Floor {
        building_id: String,
        floor_number: String,
    },

    #[error("floor {floor_id} has no room {room_number}")]
    Room {
        floor_id: FloorId,
        room_number: String,
    },
}

impl HubError {
    /// Wrap any adapter error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage(Box::new(err))
    }
}
