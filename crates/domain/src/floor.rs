//! Floor: belongs to one building, parent of rooms.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::FloorId;
use crate::room::RoomView;

/// A floor row. Only the primary key is interpreted; the other columns are
/// carried as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub id: FloorId,
    #[serde(default)]
    pub building_id: Value,
    /// Unique within the building.
    #[serde(default)]
    pub floor_number: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of the per-building details view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorDetail {
    pub floor_number: Value,
    pub total_rooms: usize,
    pub rooms: Vec<RoomView>,
}

impl FloorDetail {
    /// Assemble the details entry for `floor` from its rooms.
    #[must_use]
    pub fn new(floor: &Floor, rooms: Vec<RoomView>) -> Self {
        Self {
            floor_number: floor.floor_number.clone(),
            total_rooms: rooms.len(),
            rooms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::RoomId;
    use serde_json::json;

    fn floor() -> Floor {
        Floor {
            id: FloorId::new(10),
            building_id: json!(1),
            floor_number: json!(2),
            extra: Map::new(),
        }
    }

    #[test]
    fn should_count_rooms_when_building_detail() {
        let rooms = vec![
            RoomView {
                id: RoomId::new(1),
                room_number: json!(5),
                extra: Map::new(),
            },
            RoomView {
                id: RoomId::new(2),
                room_number: json!(6),
                extra: Map::new(),
            },
        ];
        let detail = FloorDetail::new(&floor(), rooms);
        assert_eq!(detail.floor_number, json!(2));
        assert_eq!(detail.total_rooms, 2);
    }

    #[test]
    fn should_report_zero_rooms_for_empty_floor() {
        let detail = FloorDetail::new(&floor(), Vec::new());
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value, json!({"floor_number": 2, "total_rooms": 0, "rooms": []}));
    }

    #[test]
    fn should_keep_non_integer_floor_number_as_stored() {
        let floor: Floor =
            serde_json::from_value(json!({"id": 10, "building_id": 1, "floor_number": "M"}))
                .unwrap();

        let detail = FloorDetail::new(&floor, Vec::new());

        assert_eq!(detail.floor_number, json!("M"));
    }
}
