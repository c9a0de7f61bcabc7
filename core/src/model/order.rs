// wayfare_core/src/model/order.rs

//! The order record and its status enum.
//!
//! `status` is the single authoritative lifecycle column. It must only change
//! through [`crate::guard`]-validated conditional writes; nothing else in the
//! crate (or outside it) assigns it directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::user::UserId;
use crate::pricing::FeeBreakdown;

/// Unique order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub Uuid);

impl OrderId {
  pub fn new() -> Self {
    OrderId(Uuid::new_v4())
  }
}

impl Default for OrderId {
  fn default() -> Self {
    Self::new()
  }
}

impl std::fmt::Display for OrderId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.0.fmt(f)
  }
}

/// Lifecycle states of an order.
///
/// The forward chain is `Pending -> Accepted -> Paid -> Purchased ->
/// Intransit -> Delivery -> Received`; `Cancelled` is an absorbing state
/// reached from the side rather than a position in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Accepted,
  Paid,
  Purchased,
  Intransit,
  Delivery,
  Received,
  Cancelled,
}

impl OrderStatus {
  /// Whether this state admits no further transitions.
  pub fn is_terminal(self) -> bool {
    matches!(self, OrderStatus::Received | OrderStatus::Cancelled)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Accepted => "accepted",
      OrderStatus::Paid => "paid",
      OrderStatus::Purchased => "purchased",
      OrderStatus::Intransit => "intransit",
      OrderStatus::Delivery => "delivery",
      OrderStatus::Received => "received",
      OrderStatus::Cancelled => "cancelled",
    }
  }
}

impl std::fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// What the shopper wants bought: a name, an optional store link, quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpec {
  pub name: String,
  pub store_url: Option<String>,
  pub quantity: u32,
}

/// Shopper-submitted fields for a new order. Fees and the estimated total are
/// computed by the pricing module at creation time, never taken from input.
#[derive(Debug, Clone)]
pub struct OrderDraft {
  pub item: ItemSpec,
  pub price_cents: i64,
  /// Tax the shopper expects the traveler to pay at purchase. When absent the
  /// VAT estimate from the fee quote is used.
  pub tax_estimate_cents: Option<i64>,
  pub traveler_reward_cents: i64,
  pub origin: String,
  pub destination: String,
  pub wait_days: u32,
}

/// A persisted order. Never hard-deleted; cancellation is a terminal status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
  pub id: OrderId,
  /// The shopper who created the order.
  pub shopper_id: UserId,
  /// The traveler bound at acceptance time, if any.
  pub traveler_id: Option<UserId>,
  pub item: ItemSpec,
  pub price_cents: i64,
  pub tax_estimate_cents: i64,
  pub fees: FeeBreakdown,
  pub traveler_reward_cents: i64,
  pub estimated_total_cents: i64,
  pub origin: String,
  pub destination: String,
  pub wait_days: u32,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Order {
  /// Whether `user` is the shopper who created this order.
  pub fn is_creator(&self, user: &UserId) -> bool {
    &self.shopper_id == user
  }

  /// Whether `user` is the traveler bound to this order.
  pub fn is_traveler(&self, user: &UserId) -> bool {
    self.traveler_id.as_ref() == Some(user)
  }
}
