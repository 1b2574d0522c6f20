//! Read modes of the data endpoint and the aggregate shapes they return.
//!
//! The dashboard selects a mode with free-form `page` / `fuc` parameters.
//! They are resolved once, at the boundary, into [`DataQuery`].

use serde::{Deserialize, Serialize};

use crate::building::BuildingOverview;
use crate::error::ValidationError;
use crate::floor::FloorDetail;
use crate::jacket::Jacket;

/// `page` value selecting the home views.
pub const PAGE_HOME: &str = "trangchu";
/// `page` value selecting the per-building details view.
pub const PAGE_DETAILS: &str = "details";
/// `fuc` value selecting the map listing on the home page.
pub const FUC_MAP: &str = "map";

/// Raw query parameters as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DataParams {
    pub page: Option<String>,
    pub fuc: Option<String>,
    pub building_id: Option<String>,
}

/// A resolved read request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataQuery {
    /// Every jacket row, unfiltered.
    AllJackets,
    /// Every building with floor, room and people counts.
    BuildingMap,
    /// Global counters for the home page.
    Summary,
    /// Floors and rooms of one building. The id is matched by the store as
    /// given, so a value naming no building yields no floors.
    BuildingDetails { building_id: String },
}

impl DataQuery {
    /// Resolve raw parameters into a read mode.
    ///
    /// Empty strings are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRequest`] when no mode matches.
    pub fn from_params(params: &DataParams) -> Result<Self, ValidationError> {
        let page = non_empty(params.page.as_deref());
        let fuc = non_empty(params.fuc.as_deref());
        let building_id = non_empty(params.building_id.as_deref());

        match (page, fuc, building_id) {
            (None, _, _) => Ok(Self::AllJackets),
            (Some(PAGE_HOME), Some(FUC_MAP), _) => Ok(Self::BuildingMap),
            (Some(PAGE_HOME), _, _) => Ok(Self::Summary),
            (Some(PAGE_DETAILS), _, Some(building_id)) => Ok(Self::BuildingDetails {
                building_id: building_id.to_string(),
            }),
            _ => Err(ValidationError::InvalidRequest),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Home page counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_buildings: i64,
    pub total_jackets: i64,
    /// Jackets whose `user_status` is alert.
    pub alert_status: i64,
    /// Jackets whose `user_status` is danger.
    pub danger_status: i64,
}

/// Result of a [`DataQuery`], serialized as the bare response payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    Jackets(Vec<Jacket>),
    BuildingMap(Vec<BuildingOverview>),
    Summary(Summary),
    BuildingDetails(Vec<FloorDetail>),
}
