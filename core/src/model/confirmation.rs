// wayfare_core/src/model/confirmation.rs

//! The shopper-traveler binding created when a traveler accepts an order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::order::OrderId;
use crate::model::user::{Profile, UserId};

/// Display fields copied from a profile at confirmation time.
///
/// Deliberately denormalized: later profile edits must not retroactively
/// alter what the parties saw when the deal was struck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySnapshot {
  pub display_name: String,
  pub email: String,
  pub avatar_url: Option<String>,
}

impl From<&Profile> for PartySnapshot {
  fn from(profile: &Profile) -> Self {
    PartySnapshot {
      display_name: profile.display_name.clone(),
      email: profile.email.clone(),
      avatar_url: profile.avatar_url.clone(),
    }
  }
}

/// The binding between one order and the traveler who accepted it.
///
/// At most one exists per order (first traveler to confirm wins), created
/// atomically with the order's `pending -> accepted` transition and immutable
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Confirmation {
  pub order_id: OrderId,
  pub shopper_id: UserId,
  pub traveler_id: UserId,
  pub agreed_reward_cents: i64,
  pub shopper: PartySnapshot,
  pub traveler: PartySnapshot,
  pub created_at: DateTime<Utc>,
}

impl Confirmation {
  /// Whether `user` is one of the two confirmed parties.
  pub fn involves(&self, user: &UserId) -> bool {
    &self.shopper_id == user || &self.traveler_id == user
  }
}
