//! Comment — append-only user commentary on a location.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment document. Display order is creation time, descending.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
  pub id:                String,
  pub location_id:       String,
  pub user_id:           String,
  pub user_display_name: String,
  pub text:              String,
  pub created_at:        DateTime<Utc>,
}

/// Client input for a new comment; everything else is stamped at write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
  pub text: String,
}
