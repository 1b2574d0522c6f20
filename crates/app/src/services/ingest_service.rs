//! Ingest service: validate and apply telemetry pushed by jackets.

use serde_json::Value;

use firewatch_domain::error::{HubError, NotFoundError};
use firewatch_domain::telemetry::{JacketUpdate, Scalar};

use crate::ports::{StoreSession, TelemetryStore};

/// Application service accepting jacket telemetry.
///
/// An update is only applied when the jacket is provisioned and its
/// `(building_id, floor_number, room_number)` resolves to an existing room.
/// Checks run in that order, on the values as sent, and stop at the first
/// failure. A key that is an array or an object can match no row and is
/// reported as not found. They share one session with the final update but
/// are not wrapped in a transaction, so a concurrent change between check
/// and apply is not guarded against.
pub struct IngestService<S> {
    store: S,
}

impl<S: TelemetryStore> IngestService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate a raw request body and apply it.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] for a malformed or incomplete body,
    /// [`HubError::NotFound`] for an unknown jacket, floor or room, or a
    /// storage error from the store.
    #[tracing::instrument(skip_all)]
    pub async fn submit(&self, body: &Value) -> Result<(), HubError> {
        let update = JacketUpdate::from_json(body).inspect_err(|err| {
            tracing::debug!(error = %err, "rejected telemetry payload");
        })?;
        self.apply(update).await
    }

    /// Apply a complete update after the existence checks.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] for an unknown jacket, floor or room,
    /// [`HubError::Validation`] when a reading is an array or an object, or
    /// a storage error from the store.
    #[tracing::instrument(skip(self, update), fields(uuid = %update.uuid))]
    pub async fn apply(&self, update: JacketUpdate) -> Result<(), HubError> {
        let mut session = self.store.acquire().await?;

        let jacket = match Scalar::from_json(&update.uuid) {
            Some(uuid) => session.find_jacket(&uuid).await?,
            None => None,
        };
        if jacket.is_none() {
            return Err(NotFoundError::Jacket {
                uuid: key_text(&update.uuid),
            }
            .into());
        }

        let floor = match (
            Scalar::from_json(&update.building_id),
            Scalar::from_json(&update.floor_number),
        ) {
            (Some(building_id), Some(floor_number)) => {
                session.find_floor(&building_id, &floor_number).await?
            }
            _ => None,
        };
        let floor = floor.ok_or_else(|| NotFoundError::Floor {
            building_id: key_text(&update.building_id),
            floor_number: key_text(&update.floor_number),
        })?;

        let room = match Scalar::from_json(&update.room_number) {
            Some(room_number) => session.find_room(floor.id, &room_number).await?,
            None => None,
        };
        if room.is_none() {
            return Err(NotFoundError::Room {
                floor_id: floor.id,
                room_number: key_text(&update.room_number),
            }
            .into());
        }

        let params = update.params().inspect_err(|err| {
            tracing::debug!(error = %err, "rejected telemetry readings");
        })?;
        let affected = session.apply_update(&params).await?;
        if affected == 0 {
            tracing::warn!("jacket row vanished between existence check and update");
        } else {
            tracing::debug!(status = %params.user_status, "telemetry applied");
        }
        Ok(())
    }
}

/// Key as shown in errors: strings without their JSON quotes.
fn key_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
