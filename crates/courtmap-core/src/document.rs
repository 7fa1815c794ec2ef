//! The schema-less document vocabulary shared by the core and its backends.
//!
//! Documents are JSON objects addressed by `(collection, id)`. Writes carry
//! [`Fields`] — a map from field name to [`FieldValue`] — so that callers can
//! request server-assigned timestamps without knowing the store's clock.

use std::collections::BTreeMap;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{Error, Result};

/// Collection names used by the client.
pub mod collections {
  pub const USERS: &str = "users";
  pub const LOCATIONS: &str = "locations";
  pub const COMMENTS: &str = "comments";
  pub const REPORTS: &str = "reports";
}

// ─── Field values ────────────────────────────────────────────────────────────

/// A single field in a write payload.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
  /// A literal JSON value, stored as-is.
  Json(Value),
  /// Sentinel resolved by the store to its own clock at write time, stored
  /// as an RFC 3339 string.
  ServerTime,
}

/// An ordered map of field names to write values.
///
/// Built either field-by-field or from any `Serialize` type whose
/// serialisation is a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(BTreeMap<String, FieldValue>);

impl Fields {
  pub fn new() -> Self {
    Self::default()
  }

  /// Convert a serialisable value into fields, one per top-level key.
  /// Fails unless the value serialises to a JSON object.
  pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
    match serde_json::to_value(value)? {
      Value::Object(map) => Ok(Self(
        map
          .into_iter()
          .map(|(k, v)| (k, FieldValue::Json(v)))
          .collect(),
      )),
      other => Err(Error::Validation(format!(
        "write payload must be a JSON object, got {other}"
      ))),
    }
  }

  /// Set a literal field value. Consumes and returns `self` for chaining.
  pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
    self.0.insert(field.into(), FieldValue::Json(value.into()));
    self
  }

  /// Mark a field for server-time substitution at write time.
  pub fn server_time(mut self, field: impl Into<String>) -> Self {
    self.0.insert(field.into(), FieldValue::ServerTime);
    self
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
    self.0.iter()
  }
}

impl IntoIterator for Fields {
  type Item = (String, FieldValue);
  type IntoIter = std::collections::btree_map::IntoIter<String, FieldValue>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.into_iter()
  }
}

// ─── Documents ───────────────────────────────────────────────────────────────

/// A document read back from the store. `body` never contains the id; the
/// store addresses documents by `(collection, id)` externally.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
  pub id:   String,
  pub body: serde_json::Map<String, Value>,
}

impl Document {
  /// Deserialise the document into a domain type, injecting the document id
  /// under the `id` key the way the stored shapes expect it.
  pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
    let mut body = self.body.clone();
    body.insert("id".to_owned(), Value::String(self.id.clone()));
    Ok(serde_json::from_value(Value::Object(body))?)
  }
}

// ─── Queries ─────────────────────────────────────────────────────────────────

/// An equality predicate on a named field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
  pub field:  String,
  pub equals: Value,
}

impl Filter {
  pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
    Self {
      field:  field.into(),
      equals: value.into(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Ascending,
  Descending,
}

/// Single-field ordering for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
  pub field:     String,
  pub direction: Direction,
}

impl OrderBy {
  pub fn asc(field: impl Into<String>) -> Self {
    Self {
      field:     field.into(),
      direction: Direction::Ascending,
    }
  }

  pub fn desc(field: impl Into<String>) -> Self {
    Self {
      field:     field.into(),
      direction: Direction::Descending,
    }
  }
}

#[cfg(test)]
mod tests {
  use serde::Deserialize;
  use serde_json::json;

  use super::*;

  #[test]
  fn fields_from_serialize_rejects_non_objects() {
    let err = Fields::from_serialize(&"just a string").unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
  }

  #[test]
  fn fields_builder_overrides_serialized_values() {
    #[derive(Serialize)]
    struct Payload {
      name: String,
    }

    let fields = Fields::from_serialize(&Payload { name: "a".into() })
      .unwrap()
      .set("name", "b")
      .server_time("createdAt");

    assert_eq!(fields.len(), 2);
    let by_name: Vec<_> = fields.iter().collect();
    assert_eq!(by_name[1], (&"name".to_owned(), &FieldValue::Json(json!("b"))));
    assert_eq!(by_name[0].1, &FieldValue::ServerTime);
  }

  #[test]
  fn document_deserialize_injects_id() {
    #[derive(Deserialize)]
    struct Thing {
      id:   String,
      name: String,
    }

    let doc = Document {
      id:   "abc".into(),
      body: json!({ "name": "court" }).as_object().unwrap().clone(),
    };

    let thing: Thing = doc.deserialize().unwrap();
    assert_eq!(thing.id, "abc");
    assert_eq!(thing.name, "court");
  }
}
