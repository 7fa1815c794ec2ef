//! Core types and trait definitions for the courtmap client.
//!
//! This crate is deliberately free of I/O and backend dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod authz;
pub mod backend;
pub mod comment;
pub mod document;
pub mod error;
pub mod identity;
pub mod location;
pub mod report;

pub use error::{Error, Result};
