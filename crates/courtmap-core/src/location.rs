//! Location — a sports-facility entry and its nested photo sequence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Map coordinates of a facility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
  pub lat: f64,
  pub lng: f64,
}

/// One uploaded photo. Immutable once created; only removable by its
/// uploader, and only by position within the owning location's sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
  pub url:         String,
  pub uploaded_by: String,
  pub uploaded_at: DateTime<Utc>,
}

/// A facility document as stored in the `locations` collection.
///
/// Writable only by its creator; readable by anyone. `photos` is an ordered,
/// index-addressed sequence — deletion happens by position, not identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
  pub id:               String,
  pub name:             String,
  pub description:      String,
  pub address:          String,
  pub number_of_courts: u32,
  pub surface_type:     String,
  pub is_indoor:        bool,
  pub coordinates:      Coordinates,
  #[serde(default)]
  pub photos:           Vec<Photo>,
  pub created_by:       String,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}

/// Client input for creating a location. Ownership and timestamps are
/// stamped at write time, never accepted from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLocation {
  pub name:             String,
  pub description:      String,
  pub address:          String,
  pub number_of_courts: u32,
  pub surface_type:     String,
  pub is_indoor:        bool,
  pub coordinates:      Coordinates,
}

/// Partial update payload. `None` fields are left untouched by the merge.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name:             Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub address:          Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub number_of_courts: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub surface_type:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub is_indoor:        Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub coordinates:      Option<Coordinates>,
}

impl LocationPatch {
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.description.is_none()
      && self.address.is_none()
      && self.number_of_courts.is_none()
      && self.surface_type.is_none()
      && self.is_indoor.is_none()
      && self.coordinates.is_none()
  }
}
