//! Schema and seed helpers for in-memory `SQLite` databases.
//!
//! Enabled in this crate's tests and, through the `fixtures` feature, in
//! downstream integration tests. Parents must be inserted before children:
//! `SQLite` enforces the foreign keys declared in the schema.

use sqlx::SqlitePool;

use crate::error::StorageError;
use crate::pool::{Config, Database};

/// `SQLite` rendition of the telemetry schema.
pub const SCHEMA: &str = include_str!("../fixtures/schema.sql");

/// Open a fresh in-memory database with [`SCHEMA`] installed.
///
/// # Errors
///
/// Returns [`StorageError`] if the database cannot be opened or the schema
/// fails to apply.
pub async fn memory_database() -> Result<Database, StorageError> {
    let db = Config::in_memory().build().await?;
    install_schema(&db).await?;
    Ok(db)
}

/// Run every statement of [`SCHEMA`] against `db`.
///
/// # Errors
///
/// Returns [`StorageError`] if a statement fails.
pub async fn install_schema(db: &Database) -> Result<(), StorageError> {
    for statement in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        execute(db, statement).await?;
    }
    Ok(())
}

/// Run one raw statement, for rows the typed helpers cannot express.
///
/// # Errors
///
/// Returns [`StorageError`] if the statement fails or `db` is not `SQLite`.
pub async fn execute(db: &Database, sql: &str) -> Result<(), StorageError> {
    sqlx::query(sql).execute(sqlite(db)?).await?;
    Ok(())
}

/// Insert a building row.
///
/// # Errors
///
/// Returns [`StorageError`] on constraint violation.
pub async fn insert_building(db: &Database, id: i64, name: &str) -> Result<(), StorageError> {
    sqlx::query("INSERT INTO building (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(sqlite(db)?)
        .await?;
    Ok(())
}

/// Insert a floor row.
///
/// # Errors
///
/// Returns [`StorageError`] on constraint violation.
pub async fn insert_floor(
    db: &Database,
    id: i64,
    building_id: i64,
    floor_number: i64,
) -> Result<(), StorageError> {
    sqlx::query("INSERT INTO floor (id, building_id, floor_number) VALUES (?, ?, ?)")
        .bind(id)
        .bind(building_id)
        .bind(floor_number)
        .execute(sqlite(db)?)
        .await?;
    Ok(())
}

/// Insert a room row.
///
/// # Errors
///
/// Returns [`StorageError`] on constraint violation.
pub async fn insert_room(
    db: &Database,
    id: i64,
    floor_id: i64,
    room_number: i64,
) -> Result<(), StorageError> {
    sqlx::query("INSERT INTO room (id, floor_id, room_number) VALUES (?, ?, ?)")
        .bind(id)
        .bind(floor_id)
        .bind(room_number)
        .execute(sqlite(db)?)
        .await?;
    Ok(())
}

/// Provision a jacket with no readings yet.
///
/// # Errors
///
/// Returns [`StorageError`] on constraint violation.
pub async fn insert_jacket(db: &Database, id: i64, uuid: &str) -> Result<(), StorageError> {
    sqlx::query("INSERT INTO fireproof_jacket (id, uuid) VALUES (?, ?)")
        .bind(id)
        .bind(uuid)
        .execute(sqlite(db)?)
        .await?;
    Ok(())
}

fn sqlite(db: &Database) -> Result<&SqlitePool, StorageError> {
    db.sqlite().ok_or_else(|| {
        StorageError::Database(sqlx::Error::Configuration(
            "fixtures require a SQLite database".into(),
        ))
    })
}
