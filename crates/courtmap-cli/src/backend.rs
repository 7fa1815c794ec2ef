//! Process-wide backend handles.
//!
//! The document store, blob store, and provider are initialised once at
//! startup behind a `OnceLock` and live until process exit.

use std::sync::{Arc, OnceLock};

use anyhow::Context as _;
use courtmap_core::authz::AdminPolicy;
use courtmap_store_sqlite::{DirContentStore, SqliteStore};
use courtmap_sync::{
  CommentStore, LocationStore, NavigationGuard, ReportStore, SessionStore,
};

use crate::{provider::LocalProvider, settings::Settings};

/// Every store the commands dispatch against, over one shared backend.
pub struct Backend {
  pub session:   SessionStore<LocalProvider, SqliteStore>,
  pub locations: LocationStore<SqliteStore, DirContentStore>,
  pub comments:  CommentStore<SqliteStore>,
  pub reports:   ReportStore<SqliteStore>,
  pub policy:    AdminPolicy,
}

impl Backend {
  pub fn guard(&self) -> NavigationGuard {
    NavigationGuard::new(self.session.handle(), self.policy.clone())
  }
}

static BACKEND: OnceLock<Backend> = OnceLock::new();

/// Initialise the process-wide backend from settings. Called once from
/// `main`; a second call is an error.
pub async fn init(settings: &Settings) -> anyhow::Result<&'static Backend> {
  tokio::fs::create_dir_all(&settings.data_dir)
    .await
    .with_context(|| format!("failed to create {:?}", settings.data_dir))?;

  let docs = Arc::new(
    SqliteStore::open(settings.db_path())
      .await
      .with_context(|| format!("failed to open store at {:?}", settings.db_path()))?,
  );
  let content = Arc::new(DirContentStore::new(settings.blob_dir()));
  let provider = Arc::new(
    LocalProvider::open(settings.local_identity(), settings.session_file())
      .context("failed to restore the local session")?,
  );

  let session = SessionStore::connect(provider, docs.clone());
  let handle = session.handle();
  let policy = AdminPolicy::new(settings.admin_email.clone());

  let backend = Backend {
    locations: LocationStore::new(docs.clone(), content, handle.clone()),
    comments: CommentStore::new(docs.clone(), handle.clone()),
    reports: ReportStore::new(docs, handle, policy.clone()),
    session,
    policy,
  };

  if BACKEND.set(backend).is_err() {
    anyhow::bail!("backend already initialised");
  }
  tracing::debug!(data_dir = ?settings.data_dir, "backend initialised");
  BACKEND.get().context("backend initialisation raced")
}
