//! [`LocalProvider`] — local development stand-in for the interactive
//! identity provider.
//!
//! The signed-in state persists in a JSON session file under the data
//! directory, so a sign-in survives process restarts the way a provider's
//! cached credential would.

use std::{
  collections::HashMap,
  path::PathBuf,
  sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
  },
};

use courtmap_core::{
  backend::{IdentityProvider, StateCallback, StateSubscription},
  identity::Identity,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
  #[error("session file error: {0}")]
  Io(#[from] std::io::Error),

  #[error("session file is corrupt: {0}")]
  Json(#[from] serde_json::Error),
}

struct ProviderShared {
  session_file:  PathBuf,
  current:       Mutex<Option<Identity>>,
  listeners:     Mutex<HashMap<u64, Arc<StateCallback>>>,
  next_listener: AtomicU64,
}

pub struct LocalProvider {
  /// The identity the interactive challenge signs in as.
  identity: Identity,
  shared:   Arc<ProviderShared>,
}

impl LocalProvider {
  /// Restore the persisted sign-in state; a missing session file means
  /// signed out.
  pub fn open(identity: Identity, session_file: PathBuf) -> Result<Self, ProviderError> {
    let current = match std::fs::read(&session_file) {
      Ok(bytes) => Some(serde_json::from_slice(&bytes)?),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
      Err(e) => return Err(e.into()),
    };

    Ok(Self {
      identity,
      shared: Arc::new(ProviderShared {
        session_file,
        current: Mutex::new(current),
        listeners: Mutex::new(HashMap::new()),
        next_listener: AtomicU64::new(0),
      }),
    })
  }

  fn notify(&self, identity: Option<Identity>) {
    *self
      .shared
      .current
      .lock()
      .expect("provider state lock poisoned") = identity.clone();

    let listeners: Vec<_> = self
      .shared
      .listeners
      .lock()
      .expect("listener lock poisoned")
      .values()
      .cloned()
      .collect();
    for callback in listeners {
      (*callback)(identity.clone());
    }
  }
}

impl IdentityProvider for LocalProvider {
  type Error = ProviderError;

  async fn interactive_sign_in(&self) -> Result<Identity, ProviderError> {
    let identity = self.identity.clone();

    if let Some(parent) = self.shared.session_file.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }
    let bytes = serde_json::to_vec_pretty(&identity)?;
    tokio::fs::write(&self.shared.session_file, bytes).await?;

    self.notify(Some(identity.clone()));
    Ok(identity)
  }

  async fn sign_out(&self) -> Result<(), ProviderError> {
    match tokio::fs::remove_file(&self.shared.session_file).await {
      Ok(()) => {}
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
      Err(e) => return Err(e.into()),
    }
    self.notify(None);
    Ok(())
  }

  fn on_state_change(&self, callback: StateCallback) -> StateSubscription {
    let id = self.shared.next_listener.fetch_add(1, Ordering::Relaxed);
    let callback = Arc::new(callback);
    self
      .shared
      .listeners
      .lock()
      .expect("listener lock poisoned")
      .insert(id, callback.clone());

    // First notification: the restored state, delivered off the registering
    // call stack the way a real provider resolves its initial state.
    let shared = Arc::clone(&self.shared);
    tokio::spawn(async move {
      let current = shared
        .current
        .lock()
        .expect("provider state lock poisoned")
        .clone();
      (*callback)(current);
    });

    let shared = Arc::clone(&self.shared);
    StateSubscription::new(move || {
      shared
        .listeners
        .lock()
        .expect("listener lock poisoned")
        .remove(&id);
    })
  }
}

#[cfg(test)]
mod tests {
  use std::sync::mpsc;

  use super::*;

  fn local_identity() -> Identity {
    Identity {
      uid:          "local-user".into(),
      display_name: "Local User".into(),
      email:        "local@courtmap.dev".into(),
      photo_url:    None,
    }
  }

  // Multi-threaded runtimes: the initial notification is delivered from a
  // spawned task while the test thread blocks on the channel.
  #[tokio::test(flavor = "multi_thread")]
  async fn sign_in_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");

    let provider = LocalProvider::open(local_identity(), file.clone()).unwrap();
    provider.interactive_sign_in().await.unwrap();

    let reopened = LocalProvider::open(local_identity(), file.clone()).unwrap();
    let (tx, rx) = mpsc::channel();
    let _sub = reopened.on_state_change(Box::new(move |identity| {
      tx.send(identity).ok();
    }));

    let restored = rx.recv_timeout(std::time::Duration::from_secs(1)).unwrap();
    assert_eq!(restored, Some(local_identity()));

    reopened.sign_out().await.unwrap();
    assert!(!file.exists());
  }

  #[tokio::test(flavor = "multi_thread")]
  async fn initial_notification_reports_signed_out_without_a_session_file() {
    let dir = tempfile::tempdir().unwrap();
    let provider =
      LocalProvider::open(local_identity(), dir.path().join("session.json"))
        .unwrap();

    let (tx, rx) = mpsc::channel();
    let _sub = provider.on_state_change(Box::new(move |identity| {
      tx.send(identity).ok();
    }));

    let initial = rx.recv_timeout(std::time::Duration::from_secs(1)).unwrap();
    assert_eq!(initial, None);
  }
}
