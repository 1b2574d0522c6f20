//! Row decoding through JSON.
//!
//! The schema belongs to another system, so rows are first turned into a
//! column-name → JSON map and then deserialized into domain types. Columns
//! the domain does not know about survive in the types' flattened maps.
//!
//! Each backend has its own mapper. MySQL dispatches on the declared column
//! type, since its binary protocol encodes temporal and decimal values in
//! formats that only the matching Rust type can read. `SQLite` dispatches on
//! the storage class of each value.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use sqlx::mysql::MySqlRow;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, FromRow, Row, TypeInfo, ValueRef};

/// Wrapper for converting database rows into domain types.
pub(crate) struct Wrapper<T>(pub(crate) T);

impl<T> Wrapper<T> {
    pub(crate) fn maybe(value: Option<Self>) -> Option<T> {
        value.map(|w| w.0)
    }

    pub(crate) fn all(values: Vec<Self>) -> Vec<T> {
        values.into_iter().map(|w| w.0).collect()
    }
}

/// A row that can be rendered as a JSON object.
pub(crate) trait JsonRow: Row {
    /// Every column, keyed by column name.
    fn to_json(&self) -> Result<Map<String, Value>, sqlx::Error>;
}

impl<'r, R, T> FromRow<'r, R> for Wrapper<T>
where
    R: JsonRow,
    T: DeserializeOwned,
{
    fn from_row(row: &'r R) -> Result<Self, sqlx::Error> {
        let object = row.to_json()?;
        serde_json::from_value(Value::Object(object))
            .map(Self)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))
    }
}

/// How a MySQL column is read, by declared type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MySqlKind {
    Signed,
    Unsigned,
    Float,
    Double,
    /// Exact numerics are rendered as their decimal text.
    Decimal,
    Date,
    Time,
    DateTime,
    Timestamp,
    Json,
    Bytes,
    Text,
}

impl MySqlKind {
    fn of(type_name: &str) -> Self {
        if type_name.ends_with("UNSIGNED") {
            return Self::Unsigned;
        }
        match type_name {
            "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
                Self::Signed
            }
            "FLOAT" => Self::Float,
            "DOUBLE" => Self::Double,
            "DECIMAL" => Self::Decimal,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "DATETIME" => Self::DateTime,
            "TIMESTAMP" => Self::Timestamp,
            "JSON" => Self::Json,
            "BIT" | "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB"
            | "GEOMETRY" => Self::Bytes,
            _ => Self::Text,
        }
    }
}

impl JsonRow for MySqlRow {
    fn to_json(&self) -> Result<Map<String, Value>, sqlx::Error> {
        self.columns()
            .iter()
            .map(|column| {
                let kind = MySqlKind::of(column.type_info().name());
                Ok((column.name().to_string(), mysql_value(self, column.ordinal(), kind)?))
            })
            .collect()
    }
}

fn mysql_value(row: &MySqlRow, index: usize, kind: MySqlKind) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }
    let value = match kind {
        MySqlKind::Signed => Value::from(row.try_get_unchecked::<i64, _>(index)?),
        MySqlKind::Unsigned => Value::from(row.try_get_unchecked::<u64, _>(index)?),
        MySqlKind::Float => Value::from(f64::from(row.try_get_unchecked::<f32, _>(index)?)),
        MySqlKind::Double => Value::from(row.try_get_unchecked::<f64, _>(index)?),
        MySqlKind::Decimal | MySqlKind::Text => {
            Value::String(row.try_get_unchecked::<String, _>(index)?)
        }
        MySqlKind::Date => Value::String(row.try_get::<NaiveDate, _>(index)?.to_string()),
        MySqlKind::Time => Value::String(row.try_get::<NaiveTime, _>(index)?.to_string()),
        MySqlKind::DateTime => Value::String(row.try_get::<NaiveDateTime, _>(index)?.to_string()),
        MySqlKind::Timestamp => {
            Value::String(row.try_get::<DateTime<Utc>, _>(index)?.to_rfc3339())
        }
        MySqlKind::Json => row.try_get::<Value, _>(index)?,
        MySqlKind::Bytes => lossy(&row.try_get_unchecked::<Vec<u8>, _>(index)?),
    };
    Ok(value)
}

impl JsonRow for SqliteRow {
    fn to_json(&self) -> Result<Map<String, Value>, sqlx::Error> {
        self.columns()
            .iter()
            .map(|column| Ok((column.name().to_string(), sqlite_value(self, column.ordinal())?)))
            .collect()
    }
}

// Storage class of the value itself, not the declared column type: SQLite
// keeps a REAL in an INTEGER column when it cannot be converted losslessly.
fn sqlite_value(row: &SqliteRow, index: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let storage_class = raw.type_info().name().to_string();
    let value = match storage_class.as_str() {
        "INTEGER" | "BOOLEAN" => Value::from(row.try_get_unchecked::<i64, _>(index)?),
        "REAL" => Value::from(row.try_get_unchecked::<f64, _>(index)?),
        "BLOB" => lossy(&row.try_get_unchecked::<Vec<u8>, _>(index)?),
        _ => Value::String(row.try_get_unchecked::<String, _>(index)?),
    };
    Ok(value)
}

fn lossy(bytes: &[u8]) -> Value {
    Value::String(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use serde_json::json;

    async fn select(sql: &str) -> SqliteRow {
        let db = Config::in_memory().build().await.unwrap();
        let pool = db.sqlite().unwrap();
        sqlx::query(sql).fetch_one(pool).await.unwrap()
    }

    #[tokio::test]
    async fn should_map_scalar_kinds_to_json() {
        let row = select("SELECT 1 AS i, 2.5 AS f, 'x' AS s, NULL AS n").await;
        let object = row.to_json().unwrap();
        assert_eq!(
            Value::Object(object),
            json!({"i": 1, "f": 2.5, "s": "x", "n": null})
        );
    }

    #[tokio::test]
    async fn should_keep_column_names_from_aliases() {
        let row = select("SELECT 7 AS total_rooms").await;
        let object = row.to_json().unwrap();
        assert_eq!(object.keys().collect::<Vec<_>>(), ["total_rooms"]);
    }

    #[tokio::test]
    async fn should_render_blob_as_text() {
        let row = select("SELECT X'6869' AS b").await;
        assert_eq!(row.to_json().unwrap()["b"], json!("hi"));
    }

    #[tokio::test]
    async fn should_report_decode_error_when_row_does_not_fit_type() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct NeedsId {
            id: i64,
        }

        let row = select("SELECT 'abc' AS uuid").await;
        let result = Wrapper::<NeedsId>::from_row(&row);
        assert!(matches!(result, Err(sqlx::Error::Decode(_))));
    }

    #[test]
    fn should_read_mysql_integers_by_signedness() {
        assert_eq!(MySqlKind::of("INT"), MySqlKind::Signed);
        assert_eq!(MySqlKind::of("BOOLEAN"), MySqlKind::Signed);
        assert_eq!(MySqlKind::of("YEAR"), MySqlKind::Signed);
        assert_eq!(MySqlKind::of("BIGINT UNSIGNED"), MySqlKind::Unsigned);
        assert_eq!(MySqlKind::of("TINYINT UNSIGNED"), MySqlKind::Unsigned);
    }

    #[test]
    fn should_read_mysql_decimal_temporal_and_json_columns_with_their_own_types() {
        assert_eq!(MySqlKind::of("DECIMAL"), MySqlKind::Decimal);
        assert_eq!(MySqlKind::of("DATE"), MySqlKind::Date);
        assert_eq!(MySqlKind::of("TIME"), MySqlKind::Time);
        assert_eq!(MySqlKind::of("DATETIME"), MySqlKind::DateTime);
        assert_eq!(MySqlKind::of("TIMESTAMP"), MySqlKind::Timestamp);
        assert_eq!(MySqlKind::of("JSON"), MySqlKind::Json);
    }

    #[test]
    fn should_read_other_mysql_columns_as_text_or_bytes() {
        assert_eq!(MySqlKind::of("VARCHAR"), MySqlKind::Text);
        assert_eq!(MySqlKind::of("TEXT"), MySqlKind::Text);
        assert_eq!(MySqlKind::of("ENUM"), MySqlKind::Text);
        assert_eq!(MySqlKind::of("BLOB"), MySqlKind::Bytes);
        assert_eq!(MySqlKind::of("FLOAT"), MySqlKind::Float);
        assert_eq!(MySqlKind::of("DOUBLE"), MySqlKind::Double);
    }
}
