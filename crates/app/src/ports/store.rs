//! Store port: scoped access to the relational store.
//!
//! A [`TelemetryStore`] hands out one [`StoreSession`] per inbound request.
//! The session owns its connection for as long as it lives; dropping it
//! gives the connection back, whichever way the request ends.
//!
//! Lookup keys arrive as the client sent them. Matching a text key against
//! a numeric column is left to the store's own comparison rules.

use std::future::Future;

use firewatch_domain::building::BuildingOverview;
use firewatch_domain::error::HubError;
use firewatch_domain::floor::Floor;
use firewatch_domain::id::FloorId;
use firewatch_domain::jacket::Jacket;
use firewatch_domain::query::Summary;
use firewatch_domain::room::Room;
use firewatch_domain::telemetry::{Scalar, UpdateParams};

/// Source of per-request store sessions.
pub trait TelemetryStore {
    /// Session type; releases its connection on drop.
    type Session: StoreSession + Send;

    /// Acquire a session for one request.
    fn acquire(&self) -> impl Future<Output = Result<Self::Session, HubError>> + Send;
}

/// Lookups and mutations available within one request.
pub trait StoreSession {
    /// Find the jacket provisioned under `uuid`.
    fn find_jacket(
        &mut self,
        uuid: &Scalar,
    ) -> impl Future<Output = Result<Option<Jacket>, HubError>> + Send;

    /// Find the floor numbered `floor_number` in `building_id`.
    fn find_floor(
        &mut self,
        building_id: &Scalar,
        floor_number: &Scalar,
    ) -> impl Future<Output = Result<Option<Floor>, HubError>> + Send;

    /// Find the room numbered `room_number` on `floor_id`.
    fn find_room(
        &mut self,
        floor_id: FloorId,
        room_number: &Scalar,
    ) -> impl Future<Output = Result<Option<Room>, HubError>> + Send;

    /// Overwrite location, readings and status of the jacket keyed by
    /// `update.uuid` in a single statement. Returns the affected row count.
    fn apply_update(
        &mut self,
        update: &UpdateParams,
    ) -> impl Future<Output = Result<u64, HubError>> + Send;

    /// Every jacket row.
    fn list_jackets(&mut self) -> impl Future<Output = Result<Vec<Jacket>, HubError>> + Send;

    /// Every building with its floor, room and people counts.
    fn list_building_overviews(
        &mut self,
    ) -> impl Future<Output = Result<Vec<BuildingOverview>, HubError>> + Send;

    /// Global building and jacket counters.
    fn summary(&mut self) -> impl Future<Output = Result<Summary, HubError>> + Send;

    /// Floors of `building_id`, in store order.
    fn floors_of_building(
        &mut self,
        building_id: &str,
    ) -> impl Future<Output = Result<Vec<Floor>, HubError>> + Send;

    /// Rooms of `floor_id`, in store order.
    fn rooms_of_floor(
        &mut self,
        floor_id: FloorId,
    ) -> impl Future<Output = Result<Vec<Room>, HubError>> + Send;
}
