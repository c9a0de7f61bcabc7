// wayfare_core/src/marketplace.rs

//! The `Marketplace` facade: one instance per process, constructed from the
//! repository trait objects and the identity provider, wiring the lifecycle
//! and wallet services together. UI layers call these methods; the services
//! underneath stay independently constructible for tests.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{event, instrument, Level};

use crate::cashout::PayoutRequestFlow;
use crate::confirm::ConfirmationLinker;
use crate::error::{WayfareError, WayfareResult};
use crate::guard;
use crate::identity::Identity;
use crate::ledger::WalletLedger;
use crate::model::confirmation::Confirmation;
use crate::model::order::{Order, OrderDraft, OrderId, OrderStatus};
use crate::model::wallet::{PayoutDetails, WalletTransaction};
use crate::pricing;
use crate::reward::{OrderConfirmed, RewardPayoutTrigger};
use crate::store::{
  ConfirmationStore, MemoryStore, NotificationSink, OrderStore, PayoutMethodStore, ProfileStore,
  StoreError, WalletStore,
};

pub struct Marketplace {
  orders: Arc<dyn OrderStore>,
  confirmations: Arc<dyn ConfirmationStore>,
  identity: Arc<dyn Identity>,
  linker: ConfirmationLinker,
  ledger: WalletLedger,
  reward: RewardPayoutTrigger,
  cashout: PayoutRequestFlow,
}

impl Marketplace {
  #[allow(clippy::too_many_arguments)]
  pub fn new(
    orders: Arc<dyn OrderStore>,
    confirmations: Arc<dyn ConfirmationStore>,
    wallets: Arc<dyn WalletStore>,
    profiles: Arc<dyn ProfileStore>,
    payout_methods: Arc<dyn PayoutMethodStore>,
    notifications: Arc<dyn NotificationSink>,
    identity: Arc<dyn Identity>,
  ) -> Self {
    let ledger = WalletLedger::new(wallets);
    let linker = ConfirmationLinker::new(orders.clone(), confirmations.clone(), profiles);
    let reward = RewardPayoutTrigger::new(ledger.clone());
    let cashout = PayoutRequestFlow::new(ledger.clone(), payout_methods, notifications);
    Marketplace {
      orders,
      confirmations,
      identity,
      linker,
      ledger,
      reward,
      cashout,
    }
  }

  /// Convenience constructor over one shared [`MemoryStore`].
  pub fn with_memory_store(store: Arc<MemoryStore>, identity: Arc<dyn Identity>) -> Self {
    Marketplace::new(
      store.clone(),
      store.clone(),
      store.clone(),
      store.clone(),
      store.clone(),
      store,
      identity,
    )
  }

  /// The ledger service, shared with the payout trigger and cash-out flow.
  pub fn ledger(&self) -> &WalletLedger {
    &self.ledger
  }

  /// The payout trigger, exposed so event re-delivery can be driven directly.
  pub fn reward_trigger(&self) -> &RewardPayoutTrigger {
    &self.reward
  }

  /// Creates an order for the current user with `status = pending`.
  ///
  /// Fees and the estimated total are computed here from the draft's price;
  /// the tax estimate defaults to the VAT quote when the shopper did not
  /// supply one.
  #[instrument(name = "Marketplace::create_order", skip_all, fields(shopper = %self.identity.current_user_id()), err(Display))]
  pub async fn create_order(&self, draft: OrderDraft) -> WayfareResult<Order> {
    if draft.price_cents <= 0 {
      return Err(WayfareError::InvalidAmount {
        amount_cents: draft.price_cents,
      });
    }
    if draft.traveler_reward_cents < 0 {
      return Err(WayfareError::InvalidAmount {
        amount_cents: draft.traveler_reward_cents,
      });
    }

    let fees = pricing::quote_fees(draft.price_cents);
    let tax_estimate_cents = draft.tax_estimate_cents.unwrap_or(fees.vat_estimate_cents);
    if tax_estimate_cents < 0 {
      return Err(WayfareError::InvalidAmount {
        amount_cents: tax_estimate_cents,
      });
    }
    let estimated_total_cents = pricing::estimated_total(
      draft.price_cents,
      tax_estimate_cents,
      &fees,
      draft.traveler_reward_cents,
    );

    let now = Utc::now();
    let order = Order {
      id: OrderId::new(),
      shopper_id: self.identity.current_user_id(),
      traveler_id: None,
      item: draft.item,
      price_cents: draft.price_cents,
      tax_estimate_cents,
      fees,
      traveler_reward_cents: draft.traveler_reward_cents,
      estimated_total_cents,
      origin: draft.origin,
      destination: draft.destination,
      wait_days: draft.wait_days,
      status: OrderStatus::Pending,
      created_at: now,
      updated_at: now,
    };

    self.orders.insert_order(order.clone()).await?;
    event!(Level::INFO, order_id = %order.id, "order created");
    Ok(order)
  }

  pub async fn order(&self, order_id: OrderId) -> WayfareResult<Order> {
    match self.orders.order(order_id).await {
      Ok(order) => Ok(order),
      Err(StoreError::NotFound { .. }) => Err(WayfareError::OrderNotFound { order_id }),
      Err(other) => Err(other.into()),
    }
  }

  /// Pending orders posted by other users, for the traveler browse screen.
  pub async fn browse_requests(&self) -> WayfareResult<Vec<Order>> {
    let me = self.identity.current_user_id();
    let mut pending = self.orders.pending_orders().await?;
    pending.retain(|order| !order.is_creator(&me));
    Ok(pending)
  }

  /// Accepts an order as the current user, then fires the reward payout.
  ///
  /// The payout is best-effort: a failure is logged and left for event
  /// re-delivery, never unwinding the committed confirmation.
  #[instrument(name = "Marketplace::confirm_order", skip_all, fields(order_id = %order_id), err(Display))]
  pub async fn confirm_order(&self, order_id: OrderId) -> WayfareResult<Confirmation> {
    let traveler = self.identity.current_user_id();
    let confirmation = self.linker.confirm_order(order_id, &traveler).await?;

    let order = self.order(order_id).await?;
    let confirmed = OrderConfirmed::from_parts(&order, &confirmation);
    if let Err(err) = self.reward.on_order_confirmed(&confirmed).await {
      event!(
        Level::ERROR,
        error = %err,
        "reward payout failed; confirmation stands and the payout will be retried"
      );
    }

    Ok(confirmation)
  }

  /// The statuses the current user may move this order to next.
  pub async fn allowed_transitions(
    &self,
    order_id: OrderId,
  ) -> WayfareResult<BTreeSet<OrderStatus>> {
    let actor = self.identity.current_user_id();
    let order = self.order(order_id).await?;
    let confirmation = self.confirmations.confirmation_for_order(order_id).await?;
    Ok(guard::allowed_transitions(&order, confirmation.as_ref(), &actor))
  }

  /// Moves an order to `next` on behalf of the current user.
  ///
  /// Re-validates the guard against the freshly read status and writes
  /// conditionally on that status being unchanged, so a concurrent update by
  /// the other party surfaces as `ConcurrentModification` instead of being
  /// silently overwritten. Acceptance is not reachable here: it must go
  /// through [`Marketplace::confirm_order`] so a confirmation is recorded
  /// atomically with the status flip.
  #[instrument(name = "Marketplace::update_status", skip_all, fields(order_id = %order_id, next = %next), err(Display))]
  pub async fn update_status(&self, order_id: OrderId, next: OrderStatus) -> WayfareResult<Order> {
    if next == OrderStatus::Accepted {
      return Err(WayfareError::Internal(
        "acceptance must go through confirm_order so a confirmation is recorded".to_string(),
      ));
    }

    let actor = self.identity.current_user_id();
    let order = self.order(order_id).await?;
    let confirmation = self.confirmations.confirmation_for_order(order_id).await?;
    guard::check_transition(&order, confirmation.as_ref(), &actor, next)?;

    match self.orders.set_status_if(order_id, order.status, next).await {
      Ok(updated) => {
        event!(Level::INFO, from = %order.status, to = %next, "status updated");
        Ok(updated)
      }
      Err(StoreError::NotFound { .. }) => Err(WayfareError::OrderNotFound { order_id }),
      Err(other) => Err(other.into()),
    }
  }

  /// Current user's wallet balance.
  pub async fn wallet_balance(&self) -> WayfareResult<i64> {
    self.ledger.balance(&self.identity.current_user_id()).await
  }

  /// Current user's transaction history, newest first.
  pub async fn wallet_history(&self) -> WayfareResult<Vec<WalletTransaction>> {
    self.ledger.history(&self.identity.current_user_id()).await
  }

  /// Requests a cash-out for the current user.
  pub async fn request_payout(
    &self,
    amount_cents: i64,
    details: PayoutDetails,
  ) -> WayfareResult<WalletTransaction> {
    self
      .cashout
      .request_payout(&self.identity.current_user_id(), amount_cents, details)
      .await
  }
}
