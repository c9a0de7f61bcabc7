// wayfare_core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::model::order::{OrderId, OrderStatus};
use crate::model::user::UserId;

#[derive(Debug, Error)]
pub enum WayfareError {
  #[error("Transition to '{requested}' is not allowed for user '{actor}' while order {order_id} is '{current}'")]
  IllegalTransition {
    order_id: OrderId,
    actor: UserId,
    current: OrderStatus,
    requested: OrderStatus,
  },

  #[error("Order not found: {order_id}")]
  OrderNotFound { order_id: OrderId },

  #[error("Order {order_id} is no longer pending (current status: '{current}')")]
  OrderNotPending {
    order_id: OrderId,
    current: OrderStatus,
  },

  #[error("Insufficient funds for user '{user_id}': requested {requested_cents} cents, available {available_cents} cents")]
  InsufficientFunds {
    user_id: UserId,
    requested_cents: i64,
    available_cents: i64,
  },

  #[error("Invalid amount: {amount_cents} cents (must be strictly positive)")]
  InvalidAmount { amount_cents: i64 },

  #[error("Payout details incomplete: '{field}' must not be empty")]
  InvalidPayoutDetails { field: &'static str },

  #[error("Failed to snapshot profile for user '{user_id}'. Source: {source}")]
  SnapshotFetchFailed {
    user_id: UserId,
    #[source]
    source: AnyhowError,
  },

  // Non-fatal by policy: the confirmation has already committed when this
  // surfaces, so callers log it and retry the payout independently.
  #[error("Reward payout failed for order {order_id}. Source: {source}")]
  PayoutCreditFailed {
    order_id: OrderId,
    #[source]
    source: AnyhowError,
  },

  #[error("Concurrent modification detected on {entity} '{id}'; re-read and retry")]
  ConcurrentModification { entity: &'static str, id: String },

  #[error("Record store failure. Source: {source}")]
  Store {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal wayfare error: {0}")]
  Internal(String),
}

impl WayfareError {
  /// Whether the caller may retry the failed operation with fresh state.
  ///
  /// `ConcurrentModification` means a conditional write lost a race and the
  /// operation is safe to re-issue; `PayoutCreditFailed` is retryable because
  /// the payout trigger is idempotent. Everything else is a permanent
  /// precondition or backend failure.
  pub fn is_retryable(&self) -> bool {
    matches!(
      self,
      WayfareError::ConcurrentModification { .. } | WayfareError::PayoutCreditFailed { .. }
    )
  }
}

// This is the key conversion wayfare provides for external errors: anything a
// backend adapter reports without a more precise mapping lands in `Store`.
impl From<AnyhowError> for WayfareError {
  fn from(err: AnyhowError) -> Self {
    WayfareError::Store { source: err }
  }
}

pub type WayfareResult<T, E = WayfareError> = std::result::Result<T, E>;
