//! Telemetry update: the payload a jacket pushes on every reading.
//!
//! Parsing only checks that the body is an object carrying every required
//! key, so the caller learns about all missing fields at once. Values are
//! kept exactly as sent: the store is the one that decides what it accepts,
//! and the location checks must see the payload before any typing happens.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Required payload keys, in the order they are reported when missing.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "building_id",
    "floor_number",
    "room_number",
    "temperature",
    "heart_rate",
    "gas_concentration",
    "user_status",
    "uuid",
];

/// A JSON value that can be bound as a single statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Convert a JSON value, or `None` for arrays and objects.
    ///
    /// Integers outside the `i64` range are kept as their decimal text so
    /// no digit is lost on the way to the store.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Self::Int(i),
                (None, Some(f)) if n.is_f64() => Self::Float(f),
                _ => Self::Text(n.to_string()),
            }),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// The JSON form of the value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
            Self::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => b.fmt(f),
            Self::Int(i) => i.fmt(f),
            Self::Float(x) => x.fmt(f),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A telemetry update whose required keys are all present. Every value is
/// the one the client sent, untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JacketUpdate {
    pub building_id: Value,
    pub floor_number: Value,
    pub room_number: Value,
    pub temperature: Value,
    pub heart_rate: Value,
    pub gas_concentration: Value,
    pub user_status: Value,
    pub uuid: Value,
}

/// The parameters of the jacket row overwrite. Every accepted update writes
/// all of these columns on the row identified by `uuid`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateParams {
    pub building_id: Scalar,
    pub floor_number: Scalar,
    pub room_number: Scalar,
    pub temperature: Scalar,
    pub heart_rate: Scalar,
    pub gas_concentration: Scalar,
    pub user_status: Scalar,
    pub uuid: Scalar,
}

impl JacketUpdate {
    /// Parse a raw request body.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MalformedBody`] when `body` is not an object.
    /// - [`ValidationError::MissingFields`] listing every absent key.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let object = body.as_object().ok_or(ValidationError::MalformedBody)?;

        let missing = missing_fields(object);
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let take = |name: &str| object.get(name).cloned().unwrap_or(Value::Null);
        Ok(Self {
            building_id: take("building_id"),
            floor_number: take("floor_number"),
            room_number: take("room_number"),
            temperature: take("temperature"),
            heart_rate: take("heart_rate"),
            gas_concentration: take("gas_concentration"),
            user_status: take("user_status"),
            uuid: take("uuid"),
        })
    }

    /// Bindable form of every column, checked in canonical order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidField`] for the first value that is
    /// an array or an object.
    pub fn params(&self) -> Result<UpdateParams, ValidationError> {
        Ok(UpdateParams {
            building_id: scalar(&self.building_id, "building_id")?,
            floor_number: scalar(&self.floor_number, "floor_number")?,
            room_number: scalar(&self.room_number, "room_number")?,
            temperature: scalar(&self.temperature, "temperature")?,
            heart_rate: scalar(&self.heart_rate, "heart_rate")?,
            gas_concentration: scalar(&self.gas_concentration, "gas_concentration")?,
            user_status: scalar(&self.user_status, "user_status")?,
            uuid: scalar(&self.uuid, "uuid")?,
        })
    }
}

/// Required keys absent from `object`, in canonical order. A key mapped to
/// `null` counts as present.
#[must_use]
pub fn missing_fields(object: &Map<String, Value>) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .into_iter()
        .filter(|name| !object.contains_key(*name))
        .collect()
}

fn scalar(value: &Value, field: &'static str) -> Result<Scalar, ValidationError> {
    Scalar::from_json(value).ok_or(ValidationError::InvalidField { field })
}
