//! sqlx implementation of [`TelemetryStore`] and [`StoreSession`].
//!
//! Statements are shared by both drivers. Parameters are bound from
//! [`Scalar`] values, so a key is compared by the store exactly as the
//! client sent it.

use std::future::Future;

use serde::de::DeserializeOwned;
use sqlx::pool::PoolConnection;
use sqlx::{Arguments, Database, Encode, MySql, Sqlite, Type};

use firewatch_app::ports::{StoreSession, TelemetryStore};
use firewatch_domain::building::BuildingOverview;
use firewatch_domain::error::HubError;
use firewatch_domain::floor::Floor;
use firewatch_domain::id::FloorId;
use firewatch_domain::jacket::{Jacket, UserStatus};
use firewatch_domain::query::Summary;
use firewatch_domain::room::Room;
use firewatch_domain::telemetry::{Scalar, UpdateParams};

use crate::error::StorageError;
use crate::pool::Pool;
use crate::row::Wrapper;

const SELECT_JACKET_BY_UUID: &str = "SELECT * FROM fireproof_jacket WHERE uuid = ?";
const SELECT_FLOOR_BY_NUMBER: &str =
    "SELECT * FROM floor WHERE building_id = ? AND floor_number = ?";
const SELECT_ROOM_BY_NUMBER: &str = "SELECT * FROM room WHERE floor_id = ? AND room_number = ?";
const UPDATE_JACKET: &str = "UPDATE fireproof_jacket \
     SET building_id = ?, floor_number = ?, room_number = ?, temperature = ?, \
     heart_rate = ?, gas_concentration = ?, user_status = ? \
     WHERE uuid = ?";
const SELECT_ALL_JACKETS: &str = "SELECT * FROM fireproof_jacket";
const SELECT_BUILDING_OVERVIEWS: &str = "SELECT building.*, \
     (SELECT COUNT(*) FROM floor WHERE floor.building_id = building.id) AS total_floors, \
     (SELECT COUNT(*) FROM room WHERE room.floor_id IN \
         (SELECT id FROM floor WHERE floor.building_id = building.id)) AS total_rooms, \
     (SELECT COUNT(*) FROM fireproof_jacket \
         WHERE fireproof_jacket.building_id = building.id) AS total_people \
     FROM building";
const SELECT_SUMMARY: &str = "SELECT \
     (SELECT COUNT(*) FROM building) AS total_buildings, \
     (SELECT COUNT(*) FROM fireproof_jacket) AS total_jackets, \
     (SELECT COUNT(*) FROM fireproof_jacket WHERE user_status = ?) AS alert_status, \
     (SELECT COUNT(*) FROM fireproof_jacket WHERE user_status = ?) AS danger_status";
const SELECT_FLOORS_BY_BUILDING: &str = "SELECT * FROM floor WHERE building_id = ?";
const SELECT_ROOMS_BY_FLOOR: &str = "SELECT * FROM room WHERE floor_id = ?";

/// Pool-backed store handing out one connection per session.
#[derive(Clone)]
pub struct SqlxStore {
    pool: Pool,
}

impl SqlxStore {
    pub(crate) fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

impl TelemetryStore for SqlxStore {
    type Session = SqlxSession;

    fn acquire(&self) -> impl Future<Output = Result<SqlxSession, HubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let conn = match pool {
                Pool::MySql(pool) => pool.acquire().await.map(Connection::MySql),
                Pool::Sqlite(pool) => pool.acquire().await.map(Connection::Sqlite),
            }
            .map_err(StorageError::from)?;
            tracing::trace!("store connection acquired");
            Ok(SqlxSession { conn })
        }
    }
}

enum Connection {
    MySql(PoolConnection<MySql>),
    Sqlite(PoolConnection<Sqlite>),
}

/// One pooled connection, returned to the pool when the session drops.
pub struct SqlxSession {
    conn: Connection,
}

impl Drop for SqlxSession {
    fn drop(&mut self) {
        tracing::trace!("store connection released");
    }
}

impl SqlxSession {
    async fn fetch_optional<T>(
        &mut self,
        sql: &str,
        params: &[Scalar],
    ) -> Result<Option<T>, StorageError>
    where
        T: DeserializeOwned + Send + Unpin,
    {
        let row: Option<Wrapper<T>> = match &mut self.conn {
            Connection::MySql(conn) => {
                sqlx::query_as_with::<MySql, Wrapper<T>, _>(sql, arguments::<MySql>(params)?)
                    .fetch_optional(&mut **conn)
                    .await?
            }
            Connection::Sqlite(conn) => {
                sqlx::query_as_with::<Sqlite, Wrapper<T>, _>(sql, arguments::<Sqlite>(params)?)
                    .fetch_optional(&mut **conn)
                    .await?
            }
        };
        Ok(Wrapper::maybe(row))
    }

    async fn fetch_one<T>(&mut self, sql: &str, params: &[Scalar]) -> Result<T, StorageError>
    where
        T: DeserializeOwned + Send + Unpin,
    {
        let row: Wrapper<T> = match &mut self.conn {
            Connection::MySql(conn) => {
                sqlx::query_as_with::<MySql, Wrapper<T>, _>(sql, arguments::<MySql>(params)?)
                    .fetch_one(&mut **conn)
                    .await?
            }
            Connection::Sqlite(conn) => {
                sqlx::query_as_with::<Sqlite, Wrapper<T>, _>(sql, arguments::<Sqlite>(params)?)
                    .fetch_one(&mut **conn)
                    .await?
            }
        };
        Ok(row.0)
    }

    async fn fetch_all<T>(&mut self, sql: &str, params: &[Scalar]) -> Result<Vec<T>, StorageError>
    where
        T: DeserializeOwned + Send + Unpin,
    {
        let rows: Vec<Wrapper<T>> = match &mut self.conn {
            Connection::MySql(conn) => {
                sqlx::query_as_with::<MySql, Wrapper<T>, _>(sql, arguments::<MySql>(params)?)
                    .fetch_all(&mut **conn)
                    .await?
            }
            Connection::Sqlite(conn) => {
                sqlx::query_as_with::<Sqlite, Wrapper<T>, _>(sql, arguments::<Sqlite>(params)?)
                    .fetch_all(&mut **conn)
                    .await?
            }
        };
        Ok(Wrapper::all(rows))
    }

    async fn execute(&mut self, sql: &str, params: &[Scalar]) -> Result<u64, StorageError> {
        let affected = match &mut self.conn {
            Connection::MySql(conn) => {
                sqlx::query_with::<MySql, _>(sql, arguments::<MySql>(params)?)
                    .execute(&mut **conn)
                    .await?
                    .rows_affected()
            }
            Connection::Sqlite(conn) => {
                sqlx::query_with::<Sqlite, _>(sql, arguments::<Sqlite>(params)?)
                    .execute(&mut **conn)
                    .await?
                    .rows_affected()
            }
        };
        Ok(affected)
    }
}

/// Bind each scalar with the Rust type matching its JSON kind.
fn arguments<'q, DB>(params: &[Scalar]) -> Result<DB::Arguments<'q>, sqlx::Error>
where
    DB: Database,
    bool: Encode<'q, DB> + Type<DB>,
    i64: Encode<'q, DB> + Type<DB>,
    f64: Encode<'q, DB> + Type<DB>,
    String: Encode<'q, DB> + Type<DB>,
    Option<i64>: Encode<'q, DB> + Type<DB>,
{
    let mut args = <DB::Arguments<'q>>::default();
    for param in params {
        let added = match param {
            Scalar::Null => args.add(None::<i64>),
            Scalar::Bool(value) => args.add(*value),
            Scalar::Int(value) => args.add(*value),
            Scalar::Float(value) => args.add(*value),
            Scalar::Text(value) => args.add(value.clone()),
        };
        added.map_err(sqlx::Error::Encode)?;
    }
    Ok(args)
}

impl StoreSession for SqlxSession {
    fn find_jacket(
        &mut self,
        uuid: &Scalar,
    ) -> impl Future<Output = Result<Option<Jacket>, HubError>> + Send {
        let params = [uuid.clone()];
        async move { Ok(self.fetch_optional(SELECT_JACKET_BY_UUID, &params).await?) }
    }

    fn find_floor(
        &mut self,
        building_id: &Scalar,
        floor_number: &Scalar,
    ) -> impl Future<Output = Result<Option<Floor>, HubError>> + Send {
        let params = [building_id.clone(), floor_number.clone()];
        async move { Ok(self.fetch_optional(SELECT_FLOOR_BY_NUMBER, &params).await?) }
    }

    fn find_room(
        &mut self,
        floor_id: FloorId,
        room_number: &Scalar,
    ) -> impl Future<Output = Result<Option<Room>, HubError>> + Send {
        let params = [Scalar::Int(floor_id.get()), room_number.clone()];
        async move { Ok(self.fetch_optional(SELECT_ROOM_BY_NUMBER, &params).await?) }
    }

    fn apply_update(
        &mut self,
        update: &UpdateParams,
    ) -> impl Future<Output = Result<u64, HubError>> + Send {
        let params = [
            update.building_id.clone(),
            update.floor_number.clone(),
            update.room_number.clone(),
            update.temperature.clone(),
            update.heart_rate.clone(),
            update.gas_concentration.clone(),
            update.user_status.clone(),
            update.uuid.clone(),
        ];
        async move { Ok(self.execute(UPDATE_JACKET, &params).await?) }
    }

    fn list_jackets(&mut self) -> impl Future<Output = Result<Vec<Jacket>, HubError>> + Send {
        async move { Ok(self.fetch_all(SELECT_ALL_JACKETS, &[]).await?) }
    }

    fn list_building_overviews(
        &mut self,
    ) -> impl Future<Output = Result<Vec<BuildingOverview>, HubError>> + Send {
        async move { Ok(self.fetch_all(SELECT_BUILDING_OVERVIEWS, &[]).await?) }
    }

    fn summary(&mut self) -> impl Future<Output = Result<Summary, HubError>> + Send {
        let params = [
            Scalar::Int(UserStatus::Alert.code()),
            Scalar::Int(UserStatus::Danger.code()),
        ];
        async move { Ok(self.fetch_one(SELECT_SUMMARY, &params).await?) }
    }

    fn floors_of_building(
        &mut self,
        building_id: &str,
    ) -> impl Future<Output = Result<Vec<Floor>, HubError>> + Send {
        let params = [Scalar::Text(building_id.to_string())];
        async move { Ok(self.fetch_all(SELECT_FLOORS_BY_BUILDING, &params).await?) }
    }

    fn rooms_of_floor(
        &mut self,
        floor_id: FloorId,
    ) -> impl Future<Output = Result<Vec<Room>, HubError>> + Send {
        let params = [Scalar::Int(floor_id.get())];
        async move { Ok(self.fetch_all(SELECT_ROOMS_BY_FLOOR, &params).await?) }
    }
}
