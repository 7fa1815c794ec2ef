//! Report — a user-filed complaint about a location, reviewed by the admin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review status of a report.
///
/// `Pending → Resolved` and `Pending → Dismissed` are the only transitions;
/// both targets are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
  Pending,
  Resolved,
  Dismissed,
}

impl ReportStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Resolved => "resolved",
      Self::Dismissed => "dismissed",
    }
  }

  /// No transition leaves a terminal status.
  pub fn is_terminal(&self) -> bool {
    !matches!(self, Self::Pending)
  }
}

impl std::fmt::Display for ReportStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A report document as stored in the `reports` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
  pub id:             String,
  pub location_id:    String,
  pub location_name:  String,
  /// Uid of the reporting user.
  pub reported_by:    String,
  pub reporter_email: String,
  pub reason:         String,
  pub status:         ReportStatus,
  pub created_at:     DateTime<Utc>,
}

/// Client input for filing a report. Reporter identity and the initial
/// `pending` status are stamped at write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
  pub location_id:   String,
  pub location_name: String,
  pub reason:        String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pending_is_the_only_non_terminal_status() {
    assert!(!ReportStatus::Pending.is_terminal());
    assert!(ReportStatus::Resolved.is_terminal());
    assert!(ReportStatus::Dismissed.is_terminal());
  }

  #[test]
  fn status_round_trips_through_serde() {
    for status in [
      ReportStatus::Pending,
      ReportStatus::Resolved,
      ReportStatus::Dismissed,
    ] {
      let json = serde_json::to_string(&status).unwrap();
      assert_eq!(json, format!("\"{status}\""));
      let back: ReportStatus = serde_json::from_str(&json).unwrap();
      assert_eq!(back, status);
    }
  }
}
