//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

use firewatch_domain::error::HubError;
use firewatch_domain::messages::MessageCatalog;

/// JSON error body returned by the `/data` endpoints.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_id: Option<Uuid>,
}

/// A [`HubError`] rendered through the [`MessageCatalog`], ready to be sent.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// Map `err` to its status code and client-facing message.
    ///
    /// Storage failures are logged with a fresh correlation id that is also
    /// returned to the client; their details never leave the server.
    #[must_use]
    pub fn new(messages: &MessageCatalog, err: &HubError) -> Self {
        let message = messages.describe(err);
        let (status, error_id) = match err {
            HubError::Validation(_) => (StatusCode::BAD_REQUEST, None),
            HubError::NotFound(_) => (StatusCode::NOT_FOUND, None),
            HubError::Storage(source) => {
                let error_id = Uuid::new_v4();
                tracing::error!(%error_id, error = %source, "storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, Some(error_id))
            }
        };
        Self {
            status,
            body: ErrorBody { message, error_id },
        }
    }

    /// HTTP status this error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
