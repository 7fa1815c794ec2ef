//! Encoding helpers between the document vocabulary and SQLite.
//!
//! Timestamps are stored as RFC 3339 strings, which order lexicographically
//! the same way they order chronologically — `ORDER BY` on a timestamp field
//! needs no parsing. Filter values bind as SQLite scalars matching what
//! `json_extract` yields for the stored JSON.

use chrono::{DateTime, Utc};
use courtmap_core::document::{FieldValue, Fields};
use serde_json::Value;

use crate::{Error, Result};

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

/// The JSON1 path expression addressing a top-level field.
pub fn json_path(field: &str) -> String {
  format!("$.{field}")
}

/// Bind a JSON scalar the way `json_extract` represents it: booleans as
/// integers, numbers as INTEGER or REAL, strings as TEXT.
pub fn sql_value(field: &str, value: &Value) -> Result<rusqlite::types::Value> {
  use rusqlite::types::Value as Sql;

  match value {
    Value::Null => Ok(Sql::Null),
    Value::Bool(b) => Ok(Sql::Integer(*b as i64)),
    Value::Number(n) => {
      if let Some(i) = n.as_i64() {
        Ok(Sql::Integer(i))
      } else if let Some(f) = n.as_f64() {
        Ok(Sql::Real(f))
      } else {
        Err(Error::UnsupportedFilter(field.to_owned()))
      }
    }
    Value::String(s) => Ok(Sql::Text(s.clone())),
    Value::Array(_) | Value::Object(_) => {
      Err(Error::UnsupportedFilter(field.to_owned()))
    }
  }
}

/// Resolve a write payload into plain JSON, substituting `ServerTime`
/// sentinels with `now`.
pub fn resolve_fields(
  fields: Fields,
  now: DateTime<Utc>,
) -> serde_json::Map<String, Value> {
  let now_str = encode_dt(now);
  fields
    .into_iter()
    .map(|(name, value)| {
      let json = match value {
        FieldValue::Json(v) => v,
        FieldValue::ServerTime => Value::String(now_str.clone()),
      };
      (name, json)
    })
    .collect()
}
