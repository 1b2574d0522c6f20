//! Query service: read modes backing the dashboard.

use firewatch_domain::error::HubError;
use firewatch_domain::floor::FloorDetail;
use firewatch_domain::query::{DataQuery, QueryResult};
use firewatch_domain::room::RoomView;

use crate::ports::{StoreSession, TelemetryStore};

/// Application service answering [`DataQuery`] requests.
pub struct QueryService<S> {
    store: S,
}

impl<S: TelemetryStore> QueryService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run one read mode.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the store.
    #[tracing::instrument(skip(self))]
    pub async fn query(&self, query: DataQuery) -> Result<QueryResult, HubError> {
        let mut session = self.store.acquire().await?;

        let result = match query {
            DataQuery::AllJackets => QueryResult::Jackets(session.list_jackets().await?),
            DataQuery::BuildingMap => {
                QueryResult::BuildingMap(session.list_building_overviews().await?)
            }
            DataQuery::Summary => QueryResult::Summary(session.summary().await?),
            DataQuery::BuildingDetails { building_id } => {
                QueryResult::BuildingDetails(building_details(&mut session, &building_id).await?)
            }
        };
        Ok(result)
    }
}

/// Floors of `building_id` in store order, each with its rooms stripped of
/// the `floor_id` back-reference.
async fn building_details<T: StoreSession>(
    session: &mut T,
    building_id: &str,
) -> Result<Vec<FloorDetail>, HubError> {
    let floors = session.floors_of_building(building_id).await?;
    let mut details = Vec::with_capacity(floors.len());
    for floor in &floors {
        let rooms = session.rooms_of_floor(floor.id).await?;
        let rooms = rooms.into_iter().map(RoomView::from).collect();
        details.push(FloorDetail::new(floor, rooms));
    }
    Ok(details)
}
