//! The backend trait triple the client is written against.
//!
//! Implemented by storage backends (e.g. `courtmap-store-sqlite`). The sync
//! layer depends on these abstractions, not on any concrete backend.

use std::future::Future;

use crate::{
  document::{Document, Fields, Filter, OrderBy},
  identity::Identity,
};

// ─── Document store ──────────────────────────────────────────────────────────

/// Abstraction over the remote, schema-less per-collection document store.
///
/// All methods return `Send` futures so the traits can be used in
/// multi-threaded async runtimes.
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Run a query: equality `filters` are ANDed; `order` sorts by a single
  /// named field.
  fn query<'a>(
    &'a self,
    collection: &'a str,
    filters: &'a [Filter],
    order: Option<OrderBy>,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + 'a;

  /// Fetch a single document. Returns `None` if not found.
  fn get<'a>(
    &'a self,
    collection: &'a str,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + 'a;

  /// Insert a new document under a store-assigned id and return that id.
  /// [`FieldValue::ServerTime`](crate::document::FieldValue) fields are
  /// resolved to the store's clock.
  fn insert<'a>(
    &'a self,
    collection: &'a str,
    fields: Fields,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;

  /// Shallow-merge `fields` into the document, creating it when absent.
  /// Fields not named in the payload are preserved.
  fn merge<'a>(
    &'a self,
    collection: &'a str,
    id: &'a str,
    fields: Fields,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete a document. Removing an absent document is not an error.
  fn remove<'a>(
    &'a self,
    collection: &'a str,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── Content store ───────────────────────────────────────────────────────────

/// Opaque handle to a stored blob, as returned by [`ContentStore::put`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHandle {
  path: String,
}

impl ContentHandle {
  pub fn new(path: impl Into<String>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &str {
    &self.path
  }
}

/// Abstraction over the blob-storage service holding uploaded photo bytes.
pub trait ContentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Store `bytes` under `path` and return a handle to the stored blob.
  fn put<'a>(
    &'a self,
    path: &'a str,
    bytes: Vec<u8>,
  ) -> impl Future<Output = Result<ContentHandle, Self::Error>> + Send + 'a;

  /// Resolve a handle to a retrievable URL.
  fn public_url<'a>(
    &'a self,
    handle: &'a ContentHandle,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}

// ─── Identity provider ───────────────────────────────────────────────────────

/// Callback invoked with the new signed-in state on every change.
pub type StateCallback = Box<dyn Fn(Option<Identity>) + Send + Sync + 'static>;

/// Detaches its state-change callback when dropped.
pub struct StateSubscription(Option<Box<dyn FnOnce() + Send + Sync>>);

impl StateSubscription {
  pub fn new(detach: impl FnOnce() + Send + Sync + 'static) -> Self {
    Self(Some(Box::new(detach)))
  }

  /// A subscription with nothing to detach.
  pub fn detached() -> Self {
    Self(None)
  }
}

impl Drop for StateSubscription {
  fn drop(&mut self) {
    if let Some(detach) = self.0.take() {
      detach();
    }
  }
}

impl std::fmt::Debug for StateSubscription {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_tuple("StateSubscription")
      .field(&self.0.is_some())
      .finish()
  }
}

/// Abstraction over the identity provider. Only its observable outputs are
/// modelled; the interactive challenge itself is the provider's business.
pub trait IdentityProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Run the interactive sign-in challenge and return the resulting
  /// identity.
  fn interactive_sign_in(
    &self,
  ) -> impl Future<Output = Result<Identity, Self::Error>> + Send + '_;

  fn sign_out(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Register `callback` for sign-in-state changes. The provider delivers
  /// the current state as the first notification — it may arrive after this
  /// call returns — then one notification per change until the returned
  /// subscription is dropped.
  fn on_state_change(&self, callback: StateCallback) -> StateSubscription;
}
