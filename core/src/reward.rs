// wayfare_core/src/reward.rs

//! Reward payout trigger: credits the traveler's wallet when an order is
//! confirmed.
//!
//! The event source delivers at least once, so the trigger is idempotent: it
//! skips when a `reward` transaction tagged with the order id already exists.
//! The payout amount is `price + tax estimate`: the traveler is reimbursed
//! what they will spend at the store. The separately negotiated traveler
//! reward is NOT part of this automatic credit; whether that is intentional
//! is an open business question, so the observed behavior is reproduced here
//! rather than changed.

use tracing::{event, instrument, Level};

use crate::error::{WayfareError, WayfareResult};
use crate::ledger::WalletLedger;
use crate::model::confirmation::Confirmation;
use crate::model::order::{Order, OrderId};
use crate::model::user::UserId;
use crate::model::wallet::{TransactionKind, WalletTransaction};

/// Event payload for "order confirmed", as delivered by the record-change
/// notifier. Carries everything the payout needs so re-delivery does not
/// depend on re-reading the order.
#[derive(Debug, Clone)]
pub struct OrderConfirmed {
  pub order_id: OrderId,
  pub traveler_id: UserId,
  pub price_cents: i64,
  pub tax_estimate_cents: i64,
}

impl OrderConfirmed {
  pub fn from_parts(order: &Order, confirmation: &Confirmation) -> Self {
    OrderConfirmed {
      order_id: order.id,
      traveler_id: confirmation.traveler_id.clone(),
      price_cents: order.price_cents,
      tax_estimate_cents: order.tax_estimate_cents,
    }
  }
}

/// Handler subscribed to order-confirmed events.
#[derive(Clone)]
pub struct RewardPayoutTrigger {
  ledger: WalletLedger,
}

impl RewardPayoutTrigger {
  pub fn new(ledger: WalletLedger) -> Self {
    RewardPayoutTrigger { ledger }
  }

  /// Credits the traveler exactly once per order.
  ///
  /// Returns `Ok(None)` when the payout was already recorded (duplicate
  /// delivery) and `Ok(Some(txn))` when a credit was written. Any failure is
  /// wrapped in `PayoutCreditFailed`: the confirmation has already committed,
  /// so callers log the error and leave the event available for re-delivery
  /// instead of unwinding anything.
  #[instrument(name = "RewardPayoutTrigger::on_order_confirmed", skip_all, fields(order_id = %event.order_id, traveler = %event.traveler_id), err(Display))]
  pub async fn on_order_confirmed(
    &self,
    event: &OrderConfirmed,
  ) -> WayfareResult<Option<WalletTransaction>> {
    let source = event.order_id.to_string();

    let already_paid = self
      .ledger
      .entry_exists(&event.traveler_id, TransactionKind::Reward, &source)
      .await
      .map_err(|err| WayfareError::PayoutCreditFailed {
        order_id: event.order_id,
        source: anyhow::Error::new(err),
      })?;
    if already_paid {
      event!(Level::DEBUG, "reward already credited, skipping duplicate event");
      return Ok(None);
    }

    let amount_cents = event.price_cents + event.tax_estimate_cents;
    let description = format!(
      "Reward payout for order {}: price {} cents + tax estimate {} cents",
      event.order_id, event.price_cents, event.tax_estimate_cents
    );

    match self
      .ledger
      .credit(
        &event.traveler_id,
        amount_cents,
        TransactionKind::Reward,
        &description,
        &source,
      )
      .await
    {
      Ok(transaction) => {
        event!(Level::INFO, txn_id = %transaction.id, amount_cents, "reward credited");
        Ok(Some(transaction))
      }
      Err(err) => Err(WayfareError::PayoutCreditFailed {
        order_id: event.order_id,
        source: anyhow::Error::new(err),
      }),
    }
  }
}
