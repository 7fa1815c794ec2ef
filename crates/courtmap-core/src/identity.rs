//! Identity — the authenticated user as seen by the rest of the client.

use serde::{Deserialize, Serialize};

/// The stable identity delivered by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  /// Provider-assigned user id; stable across sessions.
  pub uid:          String,
  pub display_name: String,
  pub email:        String,
  /// Avatar reference, if the provider supplies one.
  pub photo_url:    Option<String>,
}

/// The `users` collection upsert payload, written with merge semantics on
/// every successful sign-in. Fields absent from this payload are preserved
/// on the stored profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
  pub display_name: String,
  pub email:        String,
  pub full_name:    String,
  pub photo_url:    Option<String>,
}

impl UserProfile {
  pub fn from_identity(identity: &Identity) -> Self {
    Self {
      display_name: identity.display_name.clone(),
      email:        identity.email.clone(),
      full_name:    identity.display_name.clone(),
      photo_url:    identity.photo_url.clone(),
    }
  }
}
