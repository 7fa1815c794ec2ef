//! Authorization predicates.
//!
//! Pure, synchronous functions over the current identity. They are evaluated
//! fresh on every call — the identity can change between calls, so results
//! must never be cached.

use crate::identity::Identity;

/// Decides admin eligibility against the one configured administrator
/// address.
#[derive(Debug, Clone)]
pub struct AdminPolicy {
  admin_email: String,
}

impl AdminPolicy {
  pub fn new(admin_email: impl Into<String>) -> Self {
    Self {
      admin_email: admin_email.into(),
    }
  }

  /// True iff the identity's email equals the administrator address.
  pub fn is_admin(&self, identity: Option<&Identity>) -> bool {
    identity.is_some_and(|i| i.email == self.admin_email)
  }
}

/// True iff the identity's uid equals the resource's owner field
/// (`createdBy` for locations, `uploadedBy` for photos).
pub fn is_owner(identity: Option<&Identity>, owner_uid: &str) -> bool {
  identity.is_some_and(|i| i.uid == owner_uid)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn identity(uid: &str, email: &str) -> Identity {
    Identity {
      uid:          uid.into(),
      display_name: "Test User".into(),
      email:        email.into(),
      photo_url:    None,
    }
  }

  #[test]
  fn admin_matches_configured_email_only() {
    let policy = AdminPolicy::new("admin@example.com");

    let admin = identity("u1", "admin@example.com");
    let other = identity("u2", "not-admin@example.com");

    assert!(policy.is_admin(Some(&admin)));
    assert!(!policy.is_admin(Some(&other)));
    assert!(!policy.is_admin(None));
  }

  #[test]
  fn owner_matches_uid() {
    let me = identity("u1", "me@example.com");

    assert!(is_owner(Some(&me), "u1"));
    assert!(!is_owner(Some(&me), "u2"));
    assert!(!is_owner(None, "u1"));
  }
}
