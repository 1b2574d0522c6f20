//! JSON handlers for `/data`: telemetry submission and dashboard reads.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

use firewatch_app::ports::TelemetryStore;
use firewatch_domain::error::{HubError, ValidationError};
use firewatch_domain::query::{DataParams, DataQuery, QueryResult};

use crate::error::ApiError;
use crate::state::AppState;

/// Body acknowledging an applied update.
#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: String,
}

/// Possible responses from the submit endpoint.
pub enum SubmitResponse {
    Ok(Json<StatusBody>),
}

impl IntoResponse for SubmitResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the query endpoint.
pub enum QueryResponse {
    Ok(Json<QueryResult>),
}

impl IntoResponse for QueryResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /data`
pub async fn submit<S>(
    State(state): State<AppState<S>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<SubmitResponse, ApiError>
where
    S: TelemetryStore + Send + Sync + 'static,
{
    let reject = |err: HubError| ApiError::new(&state.messages, &err);

    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "unreadable telemetry body");
        reject(ValidationError::MalformedBody.into())
    })?;
    state.ingest_service.submit(&body).await.map_err(reject)?;

    Ok(SubmitResponse::Ok(Json(StatusBody {
        status: state.messages.success.clone(),
    })))
}

/// `GET /data?page=..&fuc=..&building_id=..`
pub async fn query<S>(
    State(state): State<AppState<S>>,
    params: Result<Query<DataParams>, QueryRejection>,
) -> Result<QueryResponse, ApiError>
where
    S: TelemetryStore + Send + Sync + 'static,
{
    let reject = |err: HubError| ApiError::new(&state.messages, &err);

    let Query(params) = params.map_err(|_| reject(ValidationError::InvalidRequest.into()))?;
    let query = DataQuery::from_params(&params).map_err(|err| reject(err.into()))?;
    let result = state.query_service.query(query).await.map_err(reject)?;

    Ok(QueryResponse::Ok(Json(result)))
}
