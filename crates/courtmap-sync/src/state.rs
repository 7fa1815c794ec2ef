//! The shared state shape behind every resource store.

use std::sync::RwLock;

/// Reactive state of one resource store: the last fetched result set, the
/// in-flight flag, and the last error message.
///
/// `items` is the client's only view of the remote collection and is
/// authoritative only immediately after a successful fetch.
#[derive(Debug, Clone)]
pub struct StoreState<T> {
  pub items:   Vec<T>,
  pub loading: bool,
  pub error:   Option<String>,
}

impl<T> Default for StoreState<T> {
  fn default() -> Self {
    Self {
      items:   Vec::new(),
      loading: false,
      error:   None,
    }
  }
}

/// Interior-mutability wrapper shared by the store and its readers.
///
/// The lock is held only for synchronous state flips, never across an await.
pub(crate) struct SharedState<T>(RwLock<StoreState<T>>);

impl<T: Clone> SharedState<T> {
  pub fn new() -> Self {
    Self(RwLock::new(StoreState::default()))
  }

  pub fn snapshot(&self) -> StoreState<T> {
    self.0.read().expect("state lock poisoned").clone()
  }

  /// Mark an operation in progress: raises `loading`, clears `error`.
  pub fn begin(&self) {
    let mut state = self.0.write().expect("state lock poisoned");
    state.loading = true;
    state.error = None;
  }

  /// Release the in-flight flag. Every operation calls this on exit,
  /// success and failure alike.
  pub fn finish(&self) {
    self.0.write().expect("state lock poisoned").loading = false;
  }

  pub fn set_items(&self, items: Vec<T>) {
    self.0.write().expect("state lock poisoned").items = items;
  }

  pub fn set_error(&self, message: impl Into<String>) {
    self.0.write().expect("state lock poisoned").error = Some(message.into());
  }

  /// Drop items failing the predicate — the cheap local removal used when
  /// a full refetch is unnecessary.
  pub fn retain(&self, keep: impl FnMut(&T) -> bool) {
    self.0.write().expect("state lock poisoned").items.retain(keep);
  }
}
