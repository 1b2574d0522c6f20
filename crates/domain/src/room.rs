//! Room: belongs to one floor.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::{FloorId, RoomId};

/// A room row as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub floor_id: FloorId,
    /// Unique within the floor.
    #[serde(default)]
    pub room_number: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A room as exposed by the details view, without its `floor_id`
/// back-reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomView {
    pub id: RoomId,
    #[serde(default)]
    pub room_number: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Room> for RoomView {
    fn from(room: Room) -> Self {
        Self {
            id: room.id,
            room_number: room.room_number,
            extra: room.extra,
        }
    }
}
