//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod data;

use axum::Router;
use axum::routing::get;

use firewatch_app::ports::TelemetryStore;

use crate::state::AppState;

/// Build the API sub-router.
pub fn routes<S>() -> Router<AppState<S>>
where
    S: TelemetryStore + Send + Sync + 'static,
{
    Router::new().route("/data", get(data::query::<S>).post(data::submit::<S>))
}
