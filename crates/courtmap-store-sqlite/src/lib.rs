//! Local backend for the courtmap document and content stores.
//!
//! Documents live as JSON bodies in a single SQLite file, wrapped in
//! [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Photo bytes live on the filesystem
//! under a blob directory.

mod content;
mod encode;
mod schema;
mod store;

pub mod error;

pub use content::DirContentStore;
pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
