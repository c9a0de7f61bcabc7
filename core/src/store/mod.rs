// wayfare_core/src/store/mod.rs

//! Repository seams over the durable record store.
//!
//! Each component receives these traits by `Arc<dyn …>` reference instead of
//! reaching for a shared backend client, so production adapters and the
//! in-memory fake are interchangeable. The conditional operations
//! (`accept_if_pending`, `set_status_if`, `apply_if_balance`) are the load-
//! bearing part of the contract: they must succeed only when the stored value
//! still matches the caller's expectation, and report [`StoreError::Conflict`]
//! otherwise. That predicate is what resolves every inter-client race in the
//! lifecycle and the ledger.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::confirmation::Confirmation;
use crate::model::order::{Order, OrderId, OrderStatus};
use crate::model::user::{Profile, UserId};
use crate::model::wallet::{PayoutDetails, TransactionKind, WalletTransaction};

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("{entity} not found: {id}")]
  NotFound { entity: &'static str, id: String },

  /// The conditional-write predicate failed: the stored value changed since
  /// the caller read it. Affects zero rows; the caller re-reads and retries
  /// or surfaces "someone else already acted".
  #[error("conditional write on {entity} '{id}' affected zero rows")]
  Conflict { entity: &'static str, id: String },

  /// A uniqueness constraint rejected the insert.
  #[error("{entity} already exists for {id}")]
  Duplicate { entity: &'static str, id: String },

  #[error("backend failure: {source}")]
  Backend {
    #[source]
    source: anyhow::Error,
  },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

// Fallback mapping for store errors a service does not intercept with a more
// precise domain error. Conflicts keep their retryable identity.
impl From<StoreError> for crate::error::WayfareError {
  fn from(err: StoreError) -> Self {
    match err {
      StoreError::Conflict { entity, id } => {
        crate::error::WayfareError::ConcurrentModification { entity, id }
      }
      other => crate::error::WayfareError::Store {
        source: anyhow::Error::new(other),
      },
    }
  }
}

/// Persistence for [`Order`] records. Orders are never hard-deleted.
#[async_trait]
pub trait OrderStore: Send + Sync {
  async fn insert_order(&self, order: Order) -> StoreResult<()>;

  async fn order(&self, id: OrderId) -> StoreResult<Order>;

  /// Orders still waiting for a traveler, for browse screens.
  async fn pending_orders(&self) -> StoreResult<Vec<Order>>;

  /// Atomically binds `traveler` and flips the status to `accepted`, but only
  /// while the stored status is still `pending`. The losing side of a
  /// double-acceptance race gets [`StoreError::Conflict`].
  async fn accept_if_pending(&self, id: OrderId, traveler: &UserId) -> StoreResult<Order>;

  /// Sets the status to `next` only if the stored status still equals
  /// `expected`; [`StoreError::Conflict`] otherwise.
  async fn set_status_if(
    &self,
    id: OrderId,
    expected: OrderStatus,
    next: OrderStatus,
  ) -> StoreResult<Order>;
}

/// Persistence for [`Confirmation`] records: insert-once, never updated.
#[async_trait]
pub trait ConfirmationStore: Send + Sync {
  /// Inserts the confirmation, enforcing at most one per order
  /// ([`StoreError::Duplicate`] on violation).
  async fn insert_confirmation(&self, confirmation: Confirmation) -> StoreResult<()>;

  async fn confirmation_for_order(&self, order_id: OrderId) -> StoreResult<Option<Confirmation>>;
}

/// Persistence for wallet balances and their append-only transaction log.
///
/// A balance is never written independently of a transaction record; the only
/// mutation is [`WalletStore::apply_if_balance`], which commits both sides as
/// one conditional unit.
#[async_trait]
pub trait WalletStore: Send + Sync {
  /// Current balance; users without wallet activity hold 0.
  async fn balance(&self, user: &UserId) -> StoreResult<i64>;

  /// Appends `transaction` and writes `new_balance_cents`, but only if the
  /// stored balance still equals `expected_balance_cents`. This is the
  /// compare-and-set that serializes concurrent balance mutations per user.
  async fn apply_if_balance(
    &self,
    transaction: WalletTransaction,
    expected_balance_cents: i64,
    new_balance_cents: i64,
  ) -> StoreResult<()>;

  /// Full transaction history for `user`, newest first.
  async fn history(&self, user: &UserId) -> StoreResult<Vec<WalletTransaction>>;

  /// Looks up a transaction by `(kind, source)`, the idempotency key used by
  /// the reward payout trigger.
  async fn find_by_source(
    &self,
    user: &UserId,
    kind: TransactionKind,
    source: &str,
  ) -> StoreResult<Option<WalletTransaction>>;
}

/// Read access to user profiles, the source of confirmation snapshots.
#[async_trait]
pub trait ProfileStore: Send + Sync {
  async fn profile(&self, user: &UserId) -> StoreResult<Profile>;
}

/// Upsert-keyed-by-user storage for payout instructions.
#[async_trait]
pub trait PayoutMethodStore: Send + Sync {
  async fn upsert_payout_method(&self, user: &UserId, details: PayoutDetails) -> StoreResult<()>;

  async fn payout_method(&self, user: &UserId) -> StoreResult<Option<PayoutDetails>>;
}

/// Fire-and-forget user notification sink. Callers treat failures as
/// best-effort and only log them.
#[async_trait]
pub trait NotificationSink: Send + Sync {
  async fn post_notification(&self, user: &UserId, message: &str) -> StoreResult<()>;
}
