// wayfare_core/src/cashout.rs

//! Payout request flow: converts wallet balance into an external transfer.

use std::sync::Arc;

use tracing::{event, instrument, Level};

use crate::error::{WayfareError, WayfareResult};
use crate::ledger::WalletLedger;
use crate::model::user::UserId;
use crate::model::wallet::{PayoutDetails, TransactionKind, WalletTransaction};
use crate::store::{NotificationSink, PayoutMethodStore};

#[derive(Clone)]
pub struct PayoutRequestFlow {
  ledger: WalletLedger,
  payout_methods: Arc<dyn PayoutMethodStore>,
  notifications: Arc<dyn NotificationSink>,
}

impl PayoutRequestFlow {
  pub fn new(
    ledger: WalletLedger,
    payout_methods: Arc<dyn PayoutMethodStore>,
    notifications: Arc<dyn NotificationSink>,
  ) -> Self {
    PayoutRequestFlow {
      ledger,
      payout_methods,
      notifications,
    }
  }

  /// Debits `amount_cents` from `user` towards the given payout method.
  ///
  /// Validation happens before any write: the amount must be strictly
  /// positive, the details fully populated, and the balance sufficient. On
  /// success the payout method is upserted (repeat requests overwrite rather
  /// than duplicate), one `transfer` transaction is recorded, and a
  /// best-effort notification is posted.
  #[instrument(name = "PayoutRequestFlow::request_payout", skip_all, fields(user = %user, amount_cents), err(Display))]
  pub async fn request_payout(
    &self,
    user: &UserId,
    amount_cents: i64,
    details: PayoutDetails,
  ) -> WayfareResult<WalletTransaction> {
    if amount_cents <= 0 {
      return Err(WayfareError::InvalidAmount { amount_cents });
    }
    if let Err(field) = details.validate() {
      return Err(WayfareError::InvalidPayoutDetails { field });
    }

    let available = self.ledger.balance(user).await?;
    if amount_cents > available {
      return Err(WayfareError::InsufficientFunds {
        user_id: user.clone(),
        requested_cents: amount_cents,
        available_cents: available,
      });
    }

    self
      .payout_methods
      .upsert_payout_method(user, details.clone())
      .await?;

    let description = format!(
      "Transfer of {} cents to {} ({})",
      amount_cents, details.bank_name, details.account_holder
    );
    // The debit re-checks funds under the conditional write, so a concurrent
    // spend between the check above and here still cannot overdraw.
    let transaction = self
      .ledger
      .debit(
        user,
        amount_cents,
        TransactionKind::Transfer,
        &description,
        &details.tag(),
      )
      .await?;

    let message = format!(
      "Your payout of {} cents to {} is on its way.",
      amount_cents, details.bank_name
    );
    if let Err(err) = self.notifications.post_notification(user, &message).await {
      // Fire-and-forget: the transfer already committed.
      event!(Level::WARN, error = %err, "payout notification failed");
    }

    event!(Level::INFO, txn_id = %transaction.id, "payout requested");
    Ok(transaction)
  }
}
