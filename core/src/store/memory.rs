// wayfare_core/src/store/memory.rs

//! In-memory implementation of every store trait.
//!
//! Useful for tests, examples, and benches. The conditional-write contract is
//! honored by performing the predicate check and the mutation under one lock,
//! which is exactly the guarantee a production adapter gets from conditional
//! updates on the hosted record store.
//!
//! Lock guards are never held across `.await` points; every method takes the
//! lock, finishes its work synchronously, and drops it.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};

use crate::model::confirmation::Confirmation;
use crate::model::order::{Order, OrderId, OrderStatus};
use crate::model::user::{Profile, UserId};
use crate::model::wallet::{PayoutDetails, TransactionKind, WalletTransaction};
use crate::store::{
  ConfirmationStore, NotificationSink, OrderStore, PayoutMethodStore, ProfileStore, StoreError,
  StoreResult, WalletStore,
};

/// A user's balance and ledger, kept under one lock entry so the balance can
/// never drift from the transaction log.
#[derive(Debug, Default)]
struct WalletShelf {
  balance_cents: i64,
  transactions: Vec<WalletTransaction>,
}

/// Shared in-memory backend implementing all repository traits plus the
/// notification sink.
#[derive(Default)]
pub struct MemoryStore {
  orders: RwLock<HashMap<OrderId, Order>>,
  confirmations: RwLock<HashMap<OrderId, Confirmation>>,
  wallets: Mutex<HashMap<UserId, WalletShelf>>,
  profiles: RwLock<HashMap<UserId, Profile>>,
  payout_methods: RwLock<HashMap<UserId, PayoutDetails>>,
  notifications: Mutex<Vec<(UserId, String)>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Seeds a profile record (normally owned by the identity platform).
  pub fn insert_profile(&self, profile: Profile) {
    self.profiles.write().insert(profile.user_id.clone(), profile);
  }

  /// All notifications posted so far, oldest first. For assertions.
  pub fn notifications(&self) -> Vec<(UserId, String)> {
    self.notifications.lock().clone()
  }
}

#[async_trait]
impl OrderStore for MemoryStore {
  async fn insert_order(&self, order: Order) -> StoreResult<()> {
    let mut orders = self.orders.write();
    if orders.contains_key(&order.id) {
      return Err(StoreError::Duplicate {
        entity: "order",
        id: order.id.to_string(),
      });
    }
    orders.insert(order.id, order);
    Ok(())
  }

  async fn order(&self, id: OrderId) -> StoreResult<Order> {
    self
      .orders
      .read()
      .get(&id)
      .cloned()
      .ok_or(StoreError::NotFound {
        entity: "order",
        id: id.to_string(),
      })
  }

  async fn pending_orders(&self) -> StoreResult<Vec<Order>> {
    let orders = self.orders.read();
    let mut pending: Vec<Order> = orders
      .values()
      .filter(|order| order.status == OrderStatus::Pending)
      .cloned()
      .collect();
    pending.sort_by_key(|order| order.created_at);
    Ok(pending)
  }

  async fn accept_if_pending(&self, id: OrderId, traveler: &UserId) -> StoreResult<Order> {
    let mut orders = self.orders.write();
    let order = orders.get_mut(&id).ok_or(StoreError::NotFound {
      entity: "order",
      id: id.to_string(),
    })?;
    if order.status != OrderStatus::Pending {
      return Err(StoreError::Conflict {
        entity: "order",
        id: id.to_string(),
      });
    }
    order.status = OrderStatus::Accepted;
    order.traveler_id = Some(traveler.clone());
    order.updated_at = Utc::now();
    Ok(order.clone())
  }

  async fn set_status_if(
    &self,
    id: OrderId,
    expected: OrderStatus,
    next: OrderStatus,
  ) -> StoreResult<Order> {
    let mut orders = self.orders.write();
    let order = orders.get_mut(&id).ok_or(StoreError::NotFound {
      entity: "order",
      id: id.to_string(),
    })?;
    if order.status != expected {
      return Err(StoreError::Conflict {
        entity: "order",
        id: id.to_string(),
      });
    }
    order.status = next;
    if next == OrderStatus::Pending {
      // Compensation path: unbinding the traveler restores the pre-accept row.
      order.traveler_id = None;
    }
    order.updated_at = Utc::now();
    Ok(order.clone())
  }
}

#[async_trait]
impl ConfirmationStore for MemoryStore {
  async fn insert_confirmation(&self, confirmation: Confirmation) -> StoreResult<()> {
    let mut confirmations = self.confirmations.write();
    if confirmations.contains_key(&confirmation.order_id) {
      return Err(StoreError::Duplicate {
        entity: "confirmation",
        id: confirmation.order_id.to_string(),
      });
    }
    confirmations.insert(confirmation.order_id, confirmation);
    Ok(())
  }

  async fn confirmation_for_order(&self, order_id: OrderId) -> StoreResult<Option<Confirmation>> {
    Ok(self.confirmations.read().get(&order_id).cloned())
  }
}

#[async_trait]
impl WalletStore for MemoryStore {
  async fn balance(&self, user: &UserId) -> StoreResult<i64> {
    let wallets = self.wallets.lock();
    Ok(wallets.get(user).map_or(0, |shelf| shelf.balance_cents))
  }

  async fn apply_if_balance(
    &self,
    transaction: WalletTransaction,
    expected_balance_cents: i64,
    new_balance_cents: i64,
  ) -> StoreResult<()> {
    let mut wallets = self.wallets.lock();
    let shelf = wallets.entry(transaction.user_id.clone()).or_default();
    if shelf.balance_cents != expected_balance_cents {
      return Err(StoreError::Conflict {
        entity: "wallet",
        id: transaction.user_id.to_string(),
      });
    }
    shelf.balance_cents = new_balance_cents;
    shelf.transactions.push(transaction);
    Ok(())
  }

  async fn history(&self, user: &UserId) -> StoreResult<Vec<WalletTransaction>> {
    let wallets = self.wallets.lock();
    Ok(wallets.get(user).map_or_else(Vec::new, |shelf| {
      shelf.transactions.iter().rev().cloned().collect()
    }))
  }

  async fn find_by_source(
    &self,
    user: &UserId,
    kind: TransactionKind,
    source: &str,
  ) -> StoreResult<Option<WalletTransaction>> {
    let wallets = self.wallets.lock();
    Ok(wallets.get(user).and_then(|shelf| {
      shelf
        .transactions
        .iter()
        .find(|txn| txn.kind == kind && txn.source == source)
        .cloned()
    }))
  }
}

#[async_trait]
impl ProfileStore for MemoryStore {
  async fn profile(&self, user: &UserId) -> StoreResult<Profile> {
    self
      .profiles
      .read()
      .get(user)
      .cloned()
      .ok_or(StoreError::NotFound {
        entity: "profile",
        id: user.to_string(),
      })
  }
}

#[async_trait]
impl PayoutMethodStore for MemoryStore {
  async fn upsert_payout_method(&self, user: &UserId, details: PayoutDetails) -> StoreResult<()> {
    self.payout_methods.write().insert(user.clone(), details);
    Ok(())
  }

  async fn payout_method(&self, user: &UserId) -> StoreResult<Option<PayoutDetails>> {
    Ok(self.payout_methods.read().get(user).cloned())
  }
}

#[async_trait]
impl NotificationSink for MemoryStore {
  async fn post_notification(&self, user: &UserId, message: &str) -> StoreResult<()> {
    self
      .notifications
      .lock()
      .push((user.clone(), message.to_string()));
    Ok(())
  }
}
