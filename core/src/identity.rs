// wayfare_core/src/identity.rs

//! Seam over the external identity provider.

use crate::model::user::UserId;

/// Supplies the acting user for facade-level operations. Ids and emails are
/// opaque stable strings; the core never interprets them.
pub trait Identity: Send + Sync {
  fn current_user_id(&self) -> UserId;
  fn current_user_email(&self) -> String;
}

/// Fixed identity, for tests, examples, and single-user device sessions.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
  user_id: UserId,
  email: String,
}

impl StaticIdentity {
  pub fn new<U: Into<UserId>, S: Into<String>>(user_id: U, email: S) -> Self {
    StaticIdentity {
      user_id: user_id.into(),
      email: email.into(),
    }
  }
}

impl Identity for StaticIdentity {
  fn current_user_id(&self) -> UserId {
    self.user_id.clone()
  }

  fn current_user_email(&self) -> String {
    self.email.clone()
  }
}
