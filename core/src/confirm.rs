// wayfare_core/src/confirm.rs

//! Confirmation linker: binds a traveler to a pending order.
//!
//! The `pending -> accepted` conditional status update is the lock that
//! decides a double-acceptance race; the confirmation insert follows it, and
//! an insert failure compensates the status back to `pending` so no
//! half-linked state survives. The store's one-confirmation-per-order
//! uniqueness constraint is the backstop.

use std::sync::Arc;

use chrono::Utc;
use tracing::{event, instrument, Level};

use crate::error::{WayfareError, WayfareResult};
use crate::model::confirmation::{Confirmation, PartySnapshot};
use crate::model::order::{OrderId, OrderStatus};
use crate::model::user::UserId;
use crate::store::{ConfirmationStore, OrderStore, ProfileStore, StoreError};

#[derive(Clone)]
pub struct ConfirmationLinker {
  orders: Arc<dyn OrderStore>,
  confirmations: Arc<dyn ConfirmationStore>,
  profiles: Arc<dyn ProfileStore>,
}

impl ConfirmationLinker {
  pub fn new(
    orders: Arc<dyn OrderStore>,
    confirmations: Arc<dyn ConfirmationStore>,
    profiles: Arc<dyn ProfileStore>,
  ) -> Self {
    ConfirmationLinker {
      orders,
      confirmations,
      profiles,
    }
  }

  /// Accepts `order_id` on behalf of `traveler_id`.
  ///
  /// Preconditions: the order exists, is still `pending`, and the traveler is
  /// not its creator. Profile snapshots are fetched before anything is
  /// written, so a snapshot failure leaves the order untouched. The first
  /// traveler to land the conditional accept wins; the loser gets
  /// `OrderNotPending`.
  #[instrument(name = "ConfirmationLinker::confirm_order", skip_all, fields(order_id = %order_id, traveler = %traveler_id), err(Display))]
  pub async fn confirm_order(
    &self,
    order_id: OrderId,
    traveler_id: &UserId,
  ) -> WayfareResult<Confirmation> {
    let order = match self.orders.order(order_id).await {
      Ok(order) => order,
      Err(StoreError::NotFound { .. }) => return Err(WayfareError::OrderNotFound { order_id }),
      Err(other) => return Err(other.into()),
    };

    if order.status != OrderStatus::Pending {
      return Err(WayfareError::OrderNotPending {
        order_id,
        current: order.status,
      });
    }
    if order.is_creator(traveler_id) {
      // A shopper may not confirm their own order.
      return Err(WayfareError::IllegalTransition {
        order_id,
        actor: traveler_id.clone(),
        current: order.status,
        requested: OrderStatus::Accepted,
      });
    }

    // Snapshot both profiles up front: on failure the order is untouched and
    // no confirmation is created.
    let shopper_profile = self.profiles.profile(&order.shopper_id).await.map_err(|err| {
      WayfareError::SnapshotFetchFailed {
        user_id: order.shopper_id.clone(),
        source: anyhow::Error::new(err),
      }
    })?;
    let traveler_profile = self.profiles.profile(traveler_id).await.map_err(|err| {
      WayfareError::SnapshotFetchFailed {
        user_id: traveler_id.clone(),
        source: anyhow::Error::new(err),
      }
    })?;

    // The race lock: only one traveler's accept can flip pending -> accepted.
    let accepted = match self.orders.accept_if_pending(order_id, traveler_id).await {
      Ok(order) => order,
      Err(StoreError::Conflict { .. }) => {
        let current = self
          .orders
          .order(order_id)
          .await
          .map(|o| o.status)
          .unwrap_or(OrderStatus::Accepted);
        event!(Level::INFO, %current, "lost the acceptance race");
        return Err(WayfareError::OrderNotPending { order_id, current });
      }
      Err(StoreError::NotFound { .. }) => return Err(WayfareError::OrderNotFound { order_id }),
      Err(other) => return Err(other.into()),
    };

    let confirmation = Confirmation {
      order_id,
      shopper_id: accepted.shopper_id.clone(),
      traveler_id: traveler_id.clone(),
      agreed_reward_cents: accepted.traveler_reward_cents,
      shopper: PartySnapshot::from(&shopper_profile),
      traveler: PartySnapshot::from(&traveler_profile),
      created_at: Utc::now(),
    };

    match self
      .confirmations
      .insert_confirmation(confirmation.clone())
      .await
    {
      Ok(()) => {
        event!(Level::INFO, "order confirmed");
        Ok(confirmation)
      }
      Err(StoreError::Duplicate { .. }) => {
        // Uniqueness backstop fired: another confirmation already exists, so
        // the accepted status stands with that record and ours is discarded.
        event!(
          Level::ERROR,
          "confirmation already present after winning the status race"
        );
        Err(WayfareError::OrderNotPending {
          order_id,
          current: OrderStatus::Accepted,
        })
      }
      Err(other) => {
        // Compensate the status update; confirmation and acceptance commit as
        // one logical unit or not at all.
        if let Err(rollback_err) = self
          .orders
          .set_status_if(order_id, OrderStatus::Accepted, OrderStatus::Pending)
          .await
        {
          event!(
            Level::ERROR,
            error = %rollback_err,
            "failed to roll back acceptance after confirmation insert failure; operator attention required"
          );
        }
        Err(other.into())
      }
    }
  }
}
