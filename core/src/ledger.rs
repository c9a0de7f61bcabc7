// wayfare_core/src/ledger.rs

//! Wallet ledger: per-user balance plus an append-only transaction log.
//!
//! Every balance mutation is a read-modify-write pair committed through the
//! store's conditional `apply_if_balance`, so a transaction is never recorded
//! without its matching balance update and concurrent mutations cannot lose an
//! update. Lost races are retried with fresh state a bounded number of times.
//! The automated reward payout and manual cash-outs both go through this code
//! path; there are no trusted callers with a shortcut.

use std::sync::Arc;

use tracing::{event, instrument, Level};

use crate::error::{WayfareError, WayfareResult};
use crate::model::user::UserId;
use crate::model::wallet::{TransactionKind, WalletTransaction};
use crate::store::{StoreError, WalletStore};

/// Attempts before a persistently contended balance write surfaces
/// `ConcurrentModification` to the caller.
const MAX_BALANCE_RETRIES: u32 = 8;

/// Folds a transaction history back into a balance: credits add, debits
/// subtract. For any committed sequence this reproduces `balance()` exactly.
pub fn replay_balance(history: &[WalletTransaction]) -> i64 {
  history.iter().map(WalletTransaction::signed_amount_cents).sum()
}

/// Service over a [`WalletStore`] enforcing the ledger invariants.
#[derive(Clone)]
pub struct WalletLedger {
  wallets: Arc<dyn WalletStore>,
}

impl WalletLedger {
  pub fn new(wallets: Arc<dyn WalletStore>) -> Self {
    WalletLedger { wallets }
  }

  /// Credits `amount_cents` to `user`, recording one transaction.
  ///
  /// Fails with `InvalidAmount` unless the amount is strictly positive.
  #[instrument(name = "WalletLedger::credit", skip_all, fields(user = %user, amount_cents, kind = %kind), err(Display))]
  pub async fn credit(
    &self,
    user: &UserId,
    amount_cents: i64,
    kind: TransactionKind,
    description: &str,
    source: &str,
  ) -> WayfareResult<WalletTransaction> {
    if !kind.is_credit() {
      return Err(WayfareError::Internal(format!(
        "credit called with debit kind '{kind}'"
      )));
    }
    self
      .apply(user, amount_cents, kind, description, source)
      .await
  }

  /// Debits `amount_cents` from `user`, recording one transaction.
  ///
  /// Fails with `InvalidAmount` for non-positive amounts and with
  /// `InsufficientFunds` when the amount exceeds the current balance; neither
  /// failure performs any write.
  #[instrument(name = "WalletLedger::debit", skip_all, fields(user = %user, amount_cents, kind = %kind), err(Display))]
  pub async fn debit(
    &self,
    user: &UserId,
    amount_cents: i64,
    kind: TransactionKind,
    description: &str,
    source: &str,
  ) -> WayfareResult<WalletTransaction> {
    if kind.is_credit() {
      return Err(WayfareError::Internal(format!(
        "debit called with credit kind '{kind}'"
      )));
    }
    self
      .apply(user, amount_cents, kind, description, source)
      .await
  }

  /// Shared optimistic read-modify-write loop for both directions.
  async fn apply(
    &self,
    user: &UserId,
    amount_cents: i64,
    kind: TransactionKind,
    description: &str,
    source: &str,
  ) -> WayfareResult<WalletTransaction> {
    if amount_cents <= 0 {
      return Err(WayfareError::InvalidAmount { amount_cents });
    }

    for attempt in 0..MAX_BALANCE_RETRIES {
      let balance = self.wallets.balance(user).await?;

      let new_balance = if kind.is_credit() {
        balance + amount_cents
      } else {
        if amount_cents > balance {
          return Err(WayfareError::InsufficientFunds {
            user_id: user.clone(),
            requested_cents: amount_cents,
            available_cents: balance,
          });
        }
        balance - amount_cents
      };

      let transaction = WalletTransaction::new(
        user.clone(),
        amount_cents,
        kind,
        description.to_string(),
        source.to_string(),
      );

      match self
        .wallets
        .apply_if_balance(transaction.clone(), balance, new_balance)
        .await
      {
        Ok(()) => {
          event!(
            Level::DEBUG,
            txn_id = %transaction.id,
            new_balance_cents = new_balance,
            "ledger entry committed"
          );
          return Ok(transaction);
        }
        Err(StoreError::Conflict { .. }) => {
          // Another writer landed first; re-read and recompute.
          event!(Level::TRACE, attempt, "balance changed underneath us, retrying");
          continue;
        }
        Err(other) => return Err(other.into()),
      }
    }

    Err(WayfareError::ConcurrentModification {
      entity: "wallet",
      id: user.to_string(),
    })
  }

  /// Current balance for `user` (0 for users with no wallet activity).
  pub async fn balance(&self, user: &UserId) -> WayfareResult<i64> {
    Ok(self.wallets.balance(user).await?)
  }

  /// Full transaction history for `user`, newest first. Read-only.
  pub async fn history(&self, user: &UserId) -> WayfareResult<Vec<WalletTransaction>> {
    Ok(self.wallets.history(user).await?)
  }

  /// Whether a `(kind, source)` entry already exists for `user`. Idempotency
  /// probe for the reward payout trigger.
  pub async fn entry_exists(
    &self,
    user: &UserId,
    kind: TransactionKind,
    source: &str,
  ) -> WayfareResult<bool> {
    Ok(self.wallets.find_by_source(user, kind, source).await?.is_some())
  }
}
