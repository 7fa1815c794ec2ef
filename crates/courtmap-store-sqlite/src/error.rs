//! Error type for `courtmap-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A filter value that cannot be compared in SQL (array or object).
  #[error("unsupported filter value for field {0:?}")]
  UnsupportedFilter(String),

  /// A blob path that escapes the content root.
  #[error("invalid content path: {0:?}")]
  InvalidPath(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
