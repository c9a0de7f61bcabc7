// wayfare_core/src/model/user.rs

//! User identity and profile records.
//!
//! User ids are opaque stable strings handed out by the external identity
//! provider; the core never inspects their shape.

use serde::{Deserialize, Serialize};

/// Opaque, stable identifier for a user (shopper or traveler).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
  pub fn new<S: Into<String>>(id: S) -> Self {
    UserId(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl std::fmt::Display for UserId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for UserId {
  fn from(s: &str) -> Self {
    UserId(s.to_string())
  }
}

impl From<String> for UserId {
  fn from(s: String) -> Self {
    UserId(s)
  }
}

/// Display profile for a user, the source of the denormalized snapshot fields
/// captured on a [`crate::model::Confirmation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub user_id: UserId,
  pub display_name: String,
  pub email: String,
  pub avatar_url: Option<String>,
}
