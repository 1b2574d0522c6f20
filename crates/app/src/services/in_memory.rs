//! In-memory store used by the service tests. Records every session call
//! and counts acquired and released sessions.
//!
//! Keys match when their JSON forms are equal. Text-to-number coercion is a
//! property of the relational store and is exercised by the adapter tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use firewatch_domain::building::{Building, BuildingOverview};
use firewatch_domain::error::HubError;
use firewatch_domain::floor::Floor;
use firewatch_domain::id::{BuildingId, FloorId, JacketId, RoomId};
use firewatch_domain::jacket::{Jacket, UserStatus};
use firewatch_domain::query::Summary;
use firewatch_domain::room::Room;
use firewatch_domain::telemetry::{Scalar, UpdateParams};
use serde_json::{Map, Value};

use crate::ports::{StoreSession, TelemetryStore};

#[derive(Default)]
struct Tables {
    buildings: Vec<Building>,
    floors: Vec<Floor>,
    rooms: Vec<Room>,
    jackets: Vec<Jacket>,
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    calls: Arc<Mutex<Vec<&'static str>>>,
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
    fail_on: Option<&'static str>,
}

impl InMemoryStore {
    pub(crate) fn with_building(self, id: i64, name: &str) -> Self {
        let attributes = Map::from_iter([("name".to_string(), Value::from(name))]);
        self.tables.lock().unwrap().buildings.push(Building {
            id: BuildingId::new(id),
            attributes,
        });
        self
    }

    pub(crate) fn with_floor(self, id: i64, building_id: i64, floor_number: i64) -> Self {
        self.tables.lock().unwrap().floors.push(Floor {
            id: FloorId::new(id),
            building_id: Value::from(building_id),
            floor_number: Value::from(floor_number),
            extra: Map::new(),
        });
        self
    }

    pub(crate) fn with_room(self, id: i64, floor_id: i64, room_number: i64) -> Self {
        self.tables.lock().unwrap().rooms.push(Room {
            id: RoomId::new(id),
            floor_id: FloorId::new(floor_id),
            room_number: Value::from(room_number),
            extra: Map::new(),
        });
        self
    }

    pub(crate) fn with_jacket(self, id: i64, uuid: &str) -> Self {
        self.tables
            .lock()
            .unwrap()
            .jackets
            .push(Jacket::provisioned(JacketId::new(id), uuid));
        self
    }

    /// Place a jacket in `building_id` with the given status.
    pub(crate) fn with_placed_jacket(
        self,
        id: i64,
        uuid: &str,
        building_id: i64,
        status: UserStatus,
    ) -> Self {
        let store = self.with_jacket(id, uuid);
        {
            let mut tables = store.tables.lock().unwrap();
            let jacket = tables.jackets.last_mut().unwrap();
            jacket.building_id = Value::from(building_id);
            jacket.user_status = Value::from(status.code());
        }
        store
    }

    /// Make the named session call fail with a storage error.
    pub(crate) fn failing_on(mut self, call: &'static str) -> Self {
        self.fail_on = Some(call);
        self
    }

    pub(crate) fn jacket(&self, uuid: &str) -> Option<Jacket> {
        let tables = self.tables.lock().unwrap();
        tables.jackets.iter().find(|j| j.uuid == uuid).cloned()
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub(crate) fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl TelemetryStore for InMemoryStore {
    type Session = InMemorySession;

    async fn acquire(&self) -> Result<InMemorySession, HubError> {
        if self.fail_on == Some("acquire") {
            return Err(HubError::storage(std::io::Error::other("connection refused")));
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(InMemorySession {
            store: self.clone(),
        })
    }
}

pub(crate) struct InMemorySession {
    store: InMemoryStore,
}

impl InMemorySession {
    fn record(&self, call: &'static str) -> Result<(), HubError> {
        self.store.calls.lock().unwrap().push(call);
        if self.store.fail_on == Some(call) {
            return Err(HubError::storage(std::io::Error::other("statement failed")));
        }
        Ok(())
    }
}

impl Drop for InMemorySession {
    fn drop(&mut self) {
        self.store.released.fetch_add(1, Ordering::SeqCst);
    }
}

impl StoreSession for InMemorySession {
    async fn find_jacket(&mut self, uuid: &Scalar) -> Result<Option<Jacket>, HubError> {
        self.record("find_jacket")?;
        let tables = self.store.tables.lock().unwrap();
        Ok(tables
            .jackets
            .iter()
            .find(|j| is_uuid(uuid, j))
            .cloned())
    }

    async fn find_floor(
        &mut self,
        building_id: &Scalar,
        floor_number: &Scalar,
    ) -> Result<Option<Floor>, HubError> {
        self.record("find_floor")?;
        let tables = self.store.tables.lock().unwrap();
        Ok(tables
            .floors
            .iter()
            .find(|f| {
                f.building_id == building_id.to_json() && f.floor_number == floor_number.to_json()
            })
            .cloned())
    }

    async fn find_room(
        &mut self,
        floor_id: FloorId,
        room_number: &Scalar,
    ) -> Result<Option<Room>, HubError> {
        self.record("find_room")?;
        let tables = self.store.tables.lock().unwrap();
        Ok(tables
            .rooms
            .iter()
            .find(|r| r.floor_id == floor_id && r.room_number == room_number.to_json())
            .cloned())
    }

    async fn apply_update(&mut self, update: &UpdateParams) -> Result<u64, HubError> {
        self.record("apply_update")?;
        let mut tables = self.store.tables.lock().unwrap();
        let mut affected = 0;
        for jacket in tables.jackets.iter_mut().filter(|j| is_uuid(&update.uuid, j)) {
            jacket.building_id = update.building_id.to_json();
            jacket.floor_number = update.floor_number.to_json();
            jacket.room_number = update.room_number.to_json();
            jacket.temperature = update.temperature.to_json();
            jacket.heart_rate = update.heart_rate.to_json();
            jacket.gas_concentration = update.gas_concentration.to_json();
            jacket.user_status = update.user_status.to_json();
            affected += 1;
        }
        Ok(affected)
    }

    async fn list_jackets(&mut self) -> Result<Vec<Jacket>, HubError> {
        self.record("list_jackets")?;
        Ok(self.store.tables.lock().unwrap().jackets.clone())
    }

    async fn list_building_overviews(&mut self) -> Result<Vec<BuildingOverview>, HubError> {
        self.record("list_building_overviews")?;
        let tables = self.store.tables.lock().unwrap();
        let count = |n: usize| i64::try_from(n).unwrap();
        Ok(tables
            .buildings
            .iter()
            .map(|building| {
                let floors: Vec<FloorId> = tables
                    .floors
                    .iter()
                    .filter(|f| f.building_id == Value::from(building.id.get()))
                    .map(|f| f.id)
                    .collect();
                let rooms = tables
                    .rooms
                    .iter()
                    .filter(|r| floors.contains(&r.floor_id))
                    .count();
                let people = tables
                    .jackets
                    .iter()
                    .filter(|j| j.building_id == Value::from(building.id.get()))
                    .count();
                BuildingOverview {
                    building: building.clone(),
                    total_floors: count(floors.len()),
                    total_rooms: count(rooms),
                    total_people: count(people),
                }
            })
            .collect())
    }

    async fn summary(&mut self) -> Result<Summary, HubError> {
        self.record("summary")?;
        let tables = self.store.tables.lock().unwrap();
        let with_status = |status| {
            tables
                .jackets
                .iter()
                .filter(|j| j.status() == Some(status))
                .count()
        };
        Ok(Summary {
            total_buildings: i64::try_from(tables.buildings.len()).unwrap(),
            total_jackets: i64::try_from(tables.jackets.len()).unwrap(),
            alert_status: i64::try_from(with_status(UserStatus::Alert)).unwrap(),
            danger_status: i64::try_from(with_status(UserStatus::Danger)).unwrap(),
        })
    }

    async fn floors_of_building(
        &mut self,
        building_id: &str,
    ) -> Result<Vec<Floor>, HubError> {
        self.record("floors_of_building")?;
        let tables = self.store.tables.lock().unwrap();
        Ok(tables
            .floors
            .iter()
            .filter(|f| as_text(&f.building_id) == building_id)
            .cloned()
            .collect())
    }

    async fn rooms_of_floor(&mut self, floor_id: FloorId) -> Result<Vec<Room>, HubError> {
        self.record("rooms_of_floor")?;
        let tables = self.store.tables.lock().unwrap();
        Ok(tables
            .rooms
            .iter()
            .filter(|r| r.floor_id == floor_id)
            .cloned()
            .collect())
    }
}

fn is_uuid(key: &Scalar, jacket: &Jacket) -> bool {
    matches!(key, Scalar::Text(uuid) if *uuid == jacket.uuid)
}

/// Text form of a stored key, as it would appear in a query string.
fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
