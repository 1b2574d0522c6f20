//! Building: top of the location hierarchy.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::BuildingId;

/// A building row. Descriptive columns are not owned by this service and
/// are carried verbatim in `attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// A building annotated with the counts shown on the map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingOverview {
    #[serde(flatten)]
    pub building: Building,
    /// Floors belonging to the building.
    pub total_floors: i64,
    /// Rooms belonging to any of those floors.
    pub total_rooms: i64,
    /// Jackets whose `building_id` points at the building.
    pub total_people: i64,
}
