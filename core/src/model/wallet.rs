// wayfare_core/src/model/wallet.rs

//! Wallet ledger entries and payout instruction records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::user::UserId;

/// Classification of a ledger entry. The direction is fixed by the kind so a
/// transaction can never be recorded with the wrong sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
  /// Automated credit paid to a traveler when an order is confirmed.
  Reward,
  /// Debit converting wallet balance into an external transfer.
  Transfer,
}

impl TransactionKind {
  pub fn is_credit(self) -> bool {
    matches!(self, TransactionKind::Reward)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      TransactionKind::Reward => "reward",
      TransactionKind::Transfer => "transfer",
    }
  }
}

impl std::fmt::Display for TransactionKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One immutable, append-only ledger entry.
///
/// `amount_cents` is strictly positive; credits add it to the balance and
/// debits subtract it, per [`TransactionKind::is_credit`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletTransaction {
  pub id: Uuid,
  pub user_id: UserId,
  pub amount_cents: i64,
  pub kind: TransactionKind,
  pub description: String,
  /// Reference to the originating record: an order id for rewards, a
  /// payout-method tag for transfers.
  pub source: String,
  pub created_at: DateTime<Utc>,
}

impl WalletTransaction {
  pub fn new(
    user_id: UserId,
    amount_cents: i64,
    kind: TransactionKind,
    description: String,
    source: String,
  ) -> Self {
    WalletTransaction {
      id: Uuid::new_v4(),
      user_id,
      amount_cents,
      kind,
      description,
      source,
      created_at: Utc::now(),
    }
  }

  /// The signed effect of this entry on its owner's balance.
  pub fn signed_amount_cents(&self) -> i64 {
    if self.kind.is_credit() {
      self.amount_cents
    } else {
      -self.amount_cents
    }
  }
}

/// Bank (or equivalent) payout instructions captured by the external
/// payment-detail screen. Upserted per user: repeat requests with the same
/// method overwrite rather than duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutDetails {
  pub bank_name: String,
  pub account_holder: String,
  pub account_number: String,
  pub branch: String,
}

impl PayoutDetails {
  /// All fields must be non-empty before a payout may proceed.
  /// Returns the first offending field name.
  pub fn validate(&self) -> Result<(), &'static str> {
    if self.bank_name.trim().is_empty() {
      return Err("bank_name");
    }
    if self.account_holder.trim().is_empty() {
      return Err("account_holder");
    }
    if self.account_number.trim().is_empty() {
      return Err("account_number");
    }
    if self.branch.trim().is_empty() {
      return Err("branch");
    }
    Ok(())
  }

  /// Stable tag recorded as the `source` of transfer transactions.
  pub fn tag(&self) -> String {
    format!("bank:{}", self.bank_name)
  }
}
