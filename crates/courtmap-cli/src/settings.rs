//! Configuration — a TOML file plus `COURTMAP_*` environment overrides.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use courtmap_core::identity::Identity;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// Where the document database, blob store, and session file live.
  #[serde(default = "default_data_dir")]
  pub data_dir: PathBuf,

  /// The one administrator address the authorization predicate matches.
  #[serde(default = "default_admin_email")]
  pub admin_email: String,

  /// The identity the local provider signs in as.
  #[serde(default)]
  pub identity: IdentitySettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentitySettings {
  pub uid:          String,
  pub display_name: String,
  pub email:        String,
  #[serde(default)]
  pub photo_url:    Option<String>,
}

impl Default for IdentitySettings {
  fn default() -> Self {
    Self {
      uid:          "local-user".into(),
      display_name: "Local User".into(),
      email:        "local@courtmap.dev".into(),
      photo_url:    None,
    }
  }
}

fn default_data_dir() -> PathBuf {
  PathBuf::from("~/.local/share/courtmap")
}

fn default_admin_email() -> String {
  "admin@courtmap.dev".into()
}

impl Settings {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(
        config::Environment::with_prefix("COURTMAP").separator("__"),
      )
      .build()
      .context("failed to read configuration")?;

    let mut settings: Settings = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.data_dir = expand_tilde(&settings.data_dir);
    Ok(settings)
  }

  pub fn db_path(&self) -> PathBuf {
    self.data_dir.join("courtmap.db")
  }

  pub fn blob_dir(&self) -> PathBuf {
    self.data_dir.join("blobs")
  }

  pub fn session_file(&self) -> PathBuf {
    self.data_dir.join("session.json")
  }

  pub fn local_identity(&self) -> Identity {
    Identity {
      uid:          self.identity.uid.clone(),
      display_name: self.identity.display_name.clone(),
      email:        self.identity.email.clone(),
      photo_url:    self.identity.photo_url.clone(),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
