//! Jacket: a pre-provisioned wearable sensor unit.
//!
//! Jackets are never created by this service. Their location columns are
//! denormalized copies (not foreign keys) overwritten on every accepted
//! telemetry update, and stay `NULL` until the first one.
//!
//! Reading columns are carried as raw JSON values: whatever the store holds
//! is what the dashboard gets, including codes outside [`UserStatus`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::JacketId;

/// Wearer states the dashboard counts. Other codes may be stored and are
/// passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum UserStatus {
    Normal,
    Alert,
    Danger,
}

impl UserStatus {
    /// Integer code persisted in the `user_status` column.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Normal => 0,
            Self::Alert => 1,
            Self::Danger => 2,
        }
    }
}

/// Returned when a status code is outside `0..=2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown user status code {0}")]
pub struct UnknownUserStatus(pub i64);

impl TryFrom<i64> for UserStatus {
    type Error = UnknownUserStatus;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Normal),
            1 => Ok(Self::Alert),
            2 => Ok(Self::Danger),
            other => Err(UnknownUserStatus(other)),
        }
    }
}

impl From<UserStatus> for i64 {
    fn from(status: UserStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Normal => "normal",
            Self::Alert => "alert",
            Self::Danger => "danger",
        };
        f.write_str(label)
    }
}

/// A `fireproof_jacket` row with every persisted column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jacket {
    pub id: JacketId,
    pub uuid: String,
    #[serde(default)]
    pub building_id: Value,
    #[serde(default)]
    pub floor_number: Value,
    #[serde(default)]
    pub room_number: Value,
    #[serde(default)]
    pub temperature: Value,
    #[serde(default)]
    pub heart_rate: Value,
    #[serde(default)]
    pub gas_concentration: Value,
    #[serde(default)]
    pub user_status: Value,
    /// Columns this service does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Jacket {
    /// A jacket row with only its keys set, as provisioned.
    #[must_use]
    pub fn provisioned(id: JacketId, uuid: impl Into<String>) -> Self {
        Self {
            id,
            uuid: uuid.into(),
            building_id: Value::Null,
            floor_number: Value::Null,
            room_number: Value::Null,
            temperature: Value::Null,
            heart_rate: Value::Null,
            gas_concentration: Value::Null,
            user_status: Value::Null,
            extra: Map::new(),
        }
    }

    /// The stored status, when it is one of the known codes.
    #[must_use]
    pub fn status(&self) -> Option<UserStatus> {
        self.user_status
            .as_i64()
            .and_then(|code| UserStatus::try_from(code).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_map_codes_to_statuses() {
        assert_eq!(UserStatus::try_from(0), Ok(UserStatus::Normal));
        assert_eq!(UserStatus::try_from(1), Ok(UserStatus::Alert));
        assert_eq!(UserStatus::try_from(2), Ok(UserStatus::Danger));
    }

    #[test]
    fn should_reject_unknown_status_code() {
        assert_eq!(UserStatus::try_from(3), Err(UnknownUserStatus(3)));
        assert!(serde_json::from_value::<UserStatus>(json!(-1)).is_err());
    }

    #[test]
    fn should_serialize_status_as_integer_code() {
        assert_eq!(serde_json::to_value(UserStatus::Danger).unwrap(), json!(2));
    }

    #[test]
    fn should_deserialize_freshly_provisioned_jacket_with_null_readings() {
        let jacket: Jacket = serde_json::from_value(json!({
            "id": 1,
            "uuid": "abc",
            "building_id": null,
            "floor_number": null,
            "room_number": null,
            "temperature": null,
            "heart_rate": null,
            "gas_concentration": null,
            "user_status": null
        }))
        .unwrap();
        assert_eq!(jacket, Jacket::provisioned(JacketId::new(1), "abc"));
        assert_eq!(jacket.status(), None);
    }

    #[test]
    fn should_carry_unknown_columns_through_serialization() {
        let row = json!({
            "id": 1,
            "uuid": "abc",
            "building_id": 1,
            "floor_number": 2,
            "room_number": 5,
            "temperature": 36.5,
            "heart_rate": 80,
            "gas_concentration": 0.1,
            "user_status": 0,
            "owner": "J. Doe"
        });
        let jacket: Jacket = serde_json::from_value(row.clone()).unwrap();
        assert_eq!(jacket.status(), Some(UserStatus::Normal));
        assert_eq!(serde_json::to_value(&jacket).unwrap(), row);
    }

    #[test]
    fn should_pass_through_values_outside_known_shapes() {
        let row = json!({
            "id": 2,
            "uuid": "legacy",
            "building_id": "1",
            "floor_number": null,
            "room_number": null,
            "temperature": "36.5",
            "heart_rate": 80.5,
            "gas_concentration": null,
            "user_status": 3
        });

        let jacket: Jacket = serde_json::from_value(row.clone()).unwrap();

        assert_eq!(jacket.status(), None);
        assert_eq!(jacket.heart_rate, json!(80.5));
        assert_eq!(serde_json::to_value(&jacket).unwrap(), row);
    }
}
