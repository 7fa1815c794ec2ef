//! [`DirContentStore`] — filesystem-backed blob storage for photo bytes.
//!
//! No binary data lives in the database; blobs are written under a root
//! directory and resolved to `file://` URLs.

use std::path::{Component, Path, PathBuf};

use courtmap_core::backend::{ContentHandle, ContentStore};

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct DirContentStore {
  root: PathBuf,
}

impl DirContentStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Join `path` under the root, rejecting anything that could escape it.
  fn resolve(&self, path: &str) -> Result<PathBuf> {
    let rel = Path::new(path);
    if path.is_empty()
      || rel
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
      return Err(Error::InvalidPath(path.to_owned()));
    }
    Ok(self.root.join(rel))
  }
}

impl ContentStore for DirContentStore {
  type Error = Error;

  async fn put(&self, path: &str, bytes: Vec<u8>) -> Result<ContentHandle> {
    let full = self.resolve(path)?;
    if let Some(parent) = full.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&full, bytes).await?;

    tracing::debug!(path, "blob stored");
    Ok(ContentHandle::new(path))
  }

  async fn public_url(&self, handle: &ContentHandle) -> Result<String> {
    let full = self.resolve(handle.path())?;
    let absolute = std::path::absolute(&full)?;
    Ok(format!("file://{}", absolute.display()))
  }
}
