//! Shared application state for axum handlers.

use std::sync::Arc;

use firewatch_app::ports::TelemetryStore;
use firewatch_app::services::ingest_service::IngestService;
use firewatch_app::services::query_service::QueryService;
use firewatch_domain::messages::MessageCatalog;

/// Application state shared across all axum handlers.
///
/// Generic over the store type to avoid dynamic dispatch. `Clone` is
/// implemented manually so the store itself does not need to be `Clone`,
/// only the `Arc` wrappers are cloned.
pub struct AppState<S> {
    /// Telemetry ingestion service.
    pub ingest_service: Arc<IngestService<S>>,
    /// Dashboard query service.
    pub query_service: Arc<QueryService<S>>,
    /// Texts returned to clients.
    pub messages: Arc<MessageCatalog>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            ingest_service: Arc::clone(&self.ingest_service),
            query_service: Arc::clone(&self.query_service),
            messages: Arc::clone(&self.messages),
        }
    }
}

impl<S> AppState<S>
where
    S: TelemetryStore + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        ingest_service: IngestService<S>,
        query_service: QueryService<S>,
        messages: MessageCatalog,
    ) -> Self {
        Self {
            ingest_service: Arc::new(ingest_service),
            query_service: Arc::new(query_service),
            messages: Arc::new(messages),
        }
    }

    /// Build both services over clones of one store.
    pub fn from_store(store: S, messages: MessageCatalog) -> Self
    where
        S: Clone,
    {
        Self::new(
            IngestService::new(store.clone()),
            QueryService::new(store),
            messages,
        )
    }
}
