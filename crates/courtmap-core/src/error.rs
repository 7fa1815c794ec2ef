//! Error types for `courtmap-core`.
//!
//! One taxonomy covers every store operation. List-style reads surface these
//! through the store's error slot only; mutating operations additionally
//! return them to the caller.

use thiserror::Error;

use crate::report::ReportStatus;

#[derive(Debug, Error)]
pub enum Error {
  /// The operation requires a signed-in identity and none is present.
  #[error("not signed in")]
  Unauthenticated,

  /// An identity is present but the authorization predicate denies it.
  #[error("not authorized: {0}")]
  Unauthorized(String),

  #[error("not found: {0}")]
  NotFound(String),

  /// A document-store, content-store, or provider call failed. The message
  /// is opaque to the core.
  #[error("remote error: {0}")]
  Remote(String),

  #[error("invalid input: {0}")]
  Validation(String),

  /// Attempted a status transition on a report already in a terminal state.
  #[error("report {0} is already {1}")]
  ReportClosed(String, ReportStatus),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Wrap a backend failure, erasing its type. The resulting message is all
  /// the core ever inspects.
  pub fn remote(err: impl std::error::Error) -> Self {
    Self::Remote(err.to_string())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
