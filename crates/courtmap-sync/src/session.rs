//! Session store — the authenticated-identity lifecycle and the one-shot
//! "auth ready" signal everything else waits on.

use std::sync::{Arc, RwLock};

use courtmap_core::{
  Error, Result,
  backend::{DocumentStore, IdentityProvider, StateSubscription},
  document::{Fields, collections},
  identity::{Identity, UserProfile},
};
use tokio::sync::watch;

// ─── State ───────────────────────────────────────────────────────────────────

/// Snapshot of the session, as read by the UI.
#[derive(Debug, Clone, Default)]
pub struct Session {
  pub identity:   Option<Identity>,
  pub ready:      bool,
  pub last_error: Option<String>,
}

#[derive(Debug, Default)]
struct SessionState {
  identity:   Option<Identity>,
  last_error: Option<String>,
}

#[derive(Debug)]
struct SessionShared {
  state:    RwLock<SessionState>,
  /// Flips to `true` on the provider's first state notification and never
  /// back. Waiters subscribe per call.
  ready_tx: watch::Sender<bool>,
}

// ─── Handle ──────────────────────────────────────────────────────────────────

/// Cheap, cloneable read handle onto the session.
///
/// Resource stores and the navigation guard consume this; only the owning
/// [`SessionStore`] mutates sign-in state.
#[derive(Debug, Clone)]
pub struct SessionHandle {
  shared: Arc<SessionShared>,
}

impl SessionHandle {
  fn new(shared: Arc<SessionShared>) -> Self {
    Self { shared }
  }

  pub fn identity(&self) -> Option<Identity> {
    self
      .shared
      .state
      .read()
      .expect("session lock poisoned")
      .identity
      .clone()
  }

  /// The signed-in identity, or [`Error::Unauthenticated`]. Every mutating
  /// store operation starts here.
  pub fn require_identity(&self) -> Result<Identity> {
    self.identity().ok_or(Error::Unauthenticated)
  }

  pub fn ready(&self) -> bool {
    *self.shared.ready_tx.borrow()
  }

  pub fn last_error(&self) -> Option<String> {
    self
      .shared
      .state
      .read()
      .expect("session lock poisoned")
      .last_error
      .clone()
  }

  pub fn snapshot(&self) -> Session {
    let state = self.shared.state.read().expect("session lock poisoned");
    Session {
      identity:   state.identity.clone(),
      ready:      self.ready(),
      last_error: state.last_error.clone(),
    }
  }

  /// Suspend until the provider has delivered its first state notification.
  ///
  /// Each call takes its own receiver and drops it when the wait resolves —
  /// one-shot, leaking no listeners. Resolves immediately once the session
  /// is ready.
  pub async fn wait_ready(&self) {
    let mut rx = self.shared.ready_tx.subscribe();
    // The sender lives as long as `shared`, so the wait cannot fail.
    let _ = rx.wait_for(|ready| *ready).await;
  }

  fn set_identity(&self, identity: Option<Identity>) {
    self
      .shared
      .state
      .write()
      .expect("session lock poisoned")
      .identity = identity;
  }

  fn set_error(&self, message: impl Into<String>) {
    self
      .shared
      .state
      .write()
      .expect("session lock poisoned")
      .last_error = Some(message.into());
  }

  fn clear_error(&self) {
    self
      .shared
      .state
      .write()
      .expect("session lock poisoned")
      .last_error = None;
  }

  fn mark_ready(&self) {
    self.shared.ready_tx.send_replace(true);
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Owns the identity-provider connection for the life of the process.
pub struct SessionStore<P, D> {
  provider:  Arc<P>,
  docs:      Arc<D>,
  handle:    SessionHandle,
  /// Held for the process lifetime; dropping it would detach the listener.
  _listener: StateSubscription,
}

impl<P: IdentityProvider, D: DocumentStore> SessionStore<P, D> {
  /// Create the store and subscribe — once, for the process lifetime — to
  /// the provider's state-change notifications. The first notification,
  /// signed-in or signed-out, flips `ready` exactly once; later ones only
  /// replace the identity.
  pub fn connect(provider: Arc<P>, docs: Arc<D>) -> Self {
    let shared = Arc::new(SessionShared {
      state:    RwLock::new(SessionState::default()),
      ready_tx: watch::channel(false).0,
    });
    let handle = SessionHandle::new(shared);

    let listener = provider.on_state_change(Box::new({
      let handle = handle.clone();
      move |identity| {
        tracing::debug!(signed_in = identity.is_some(), "identity state changed");
        handle.set_identity(identity);
        handle.mark_ready();
      }
    }));

    Self {
      provider,
      docs,
      handle,
      _listener: listener,
    }
  }

  pub fn handle(&self) -> SessionHandle {
    self.handle.clone()
  }

  /// Launch the interactive sign-in challenge, then upsert the user profile
  /// into the `users` collection with merge semantics.
  ///
  /// Failures are captured into `last_error` and observed there; this never
  /// returns an error to the caller.
  pub async fn begin_sign_in(&self) {
    match self.provider.interactive_sign_in().await {
      Ok(identity) => {
        self.handle.set_identity(Some(identity.clone()));
        match self.upsert_profile(&identity).await {
          Ok(()) => {
            self.handle.clear_error();
            tracing::info!(uid = %identity.uid, "signed in");
          }
          Err(e) => {
            tracing::error!(error = %e, "profile upsert failed");
            self.handle.set_error(e.to_string());
          }
        }
      }
      Err(e) => {
        tracing::error!(error = %e, "sign-in failed");
        self.handle.set_error(e.to_string());
      }
    }
  }

  /// Clear the provider session and reset the identity. The sign-out is
  /// logged as the user-visible notification.
  pub async fn end_sign_in(&self) {
    match self.provider.sign_out().await {
      Ok(()) => {
        self.handle.set_identity(None);
        self.handle.clear_error();
        tracing::info!("signed out");
      }
      Err(e) => {
        tracing::error!(error = %e, "sign-out failed");
        self.handle.set_error(e.to_string());
      }
    }
  }

  async fn upsert_profile(&self, identity: &Identity) -> Result<()> {
    let fields = Fields::from_serialize(&UserProfile::from_identity(identity))?
      .server_time("lastSignInAt");
    self
      .docs
      .merge(collections::USERS, &identity.uid, fields)
      .await
      .map_err(Error::remote)
  }
}
