// wayfare_core/src/guard.rs

//! Status transition guard: the single authority on which lifecycle moves are
//! legal for which actor.
//!
//! The guard is a pure function over `(order, confirmation, actor)`; callers
//! re-evaluate it at write time against the *current* stored status and apply
//! the transition with a conditional write, so a stale client-held copy can
//! never push the order somewhere illegal.

use std::collections::BTreeSet;

use crate::error::{WayfareError, WayfareResult};
use crate::model::confirmation::Confirmation;
use crate::model::order::{Order, OrderStatus};
use crate::model::user::UserId;

/// The forward status chain, in order. `Cancelled` is deliberately absent:
/// it is an absorbing side-state, not a chain position.
pub const STATUS_CHAIN: [OrderStatus; 7] = [
  OrderStatus::Pending,
  OrderStatus::Accepted,
  OrderStatus::Paid,
  OrderStatus::Purchased,
  OrderStatus::Intransit,
  OrderStatus::Delivery,
  OrderStatus::Received,
];

/// Where an order sits for progress rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
  /// Zero-based position within [`STATUS_CHAIN`], plus the chain length.
  Step { position: usize, of: usize },
  /// Rendered as a distinct terminal visual, never as a chain position.
  Cancelled,
}

/// Pure function of `status` and the ordered chain; drives progress bars.
pub fn progress(status: OrderStatus) -> Progress {
  match STATUS_CHAIN.iter().position(|s| *s == status) {
    Some(position) => Progress::Step {
      position,
      of: STATUS_CHAIN.len(),
    },
    None => Progress::Cancelled,
  }
}

/// Computes the set of statuses `actor` may move `order` to next.
///
/// Empty set means the actor has no standing to change the status at all.
/// Role policy:
/// - while `pending`, the creator may cancel and any other user may accept;
/// - once confirmed, the traveler advances `purchased -> intransit ->
///   delivery` (starting from `accepted` or `paid`), the shopper sets `paid`
///   and finally `received`, and either confirmed party may cancel from any
///   non-terminal state;
/// - terminal states admit nothing.
pub fn allowed_transitions(
  order: &Order,
  confirmation: Option<&Confirmation>,
  actor: &UserId,
) -> BTreeSet<OrderStatus> {
  let mut allowed = BTreeSet::new();

  if order.status.is_terminal() {
    return allowed;
  }

  if order.status == OrderStatus::Pending {
    if order.is_creator(actor) {
      allowed.insert(OrderStatus::Cancelled);
    } else {
      // Accepting additionally requires a Confirmation to be created for
      // this (order, traveler) pair; the confirmation linker owns that.
      allowed.insert(OrderStatus::Accepted);
    }
    return allowed;
  }

  // Past pending, only the two confirmed parties have standing.
  let Some(confirmation) = confirmation else {
    return allowed;
  };
  if !confirmation.involves(actor) {
    return allowed;
  }

  allowed.insert(OrderStatus::Cancelled);

  if &confirmation.traveler_id == actor {
    match order.status {
      OrderStatus::Accepted | OrderStatus::Paid => {
        allowed.insert(OrderStatus::Purchased);
      }
      OrderStatus::Purchased => {
        allowed.insert(OrderStatus::Intransit);
      }
      OrderStatus::Intransit => {
        allowed.insert(OrderStatus::Delivery);
      }
      _ => {}
    }
  } else {
    match order.status {
      OrderStatus::Accepted => {
        allowed.insert(OrderStatus::Paid);
      }
      OrderStatus::Delivery => {
        allowed.insert(OrderStatus::Received);
      }
      _ => {}
    }
  }

  allowed
}

/// Validates a requested transition, producing `IllegalTransition` (and no
/// mutation anywhere) when the guard does not permit it.
pub fn check_transition(
  order: &Order,
  confirmation: Option<&Confirmation>,
  actor: &UserId,
  requested: OrderStatus,
) -> WayfareResult<()> {
  if allowed_transitions(order, confirmation, actor).contains(&requested) {
    Ok(())
  } else {
    Err(WayfareError::IllegalTransition {
      order_id: order.id,
      actor: actor.clone(),
      current: order.status,
      requested,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;

  use crate::model::confirmation::PartySnapshot;
  use crate::model::order::{ItemSpec, OrderId};
  use crate::pricing::quote_fees;

  fn snapshot(name: &str) -> PartySnapshot {
    PartySnapshot {
      display_name: name.to_string(),
      email: format!("{name}@example.com"),
      avatar_url: None,
    }
  }

  fn order_in(status: OrderStatus) -> Order {
    let fees = quote_fees(10_000);
    Order {
      id: OrderId::new(),
      shopper_id: UserId::from("shopper-1"),
      traveler_id: (status != OrderStatus::Pending).then(|| UserId::from("traveler-1")),
      item: ItemSpec {
        name: "headphones".to_string(),
        store_url: None,
        quantity: 1,
      },
      price_cents: 10_000,
      tax_estimate_cents: 1_500,
      fees,
      traveler_reward_cents: 2_000,
      estimated_total_cents: 0,
      origin: "Berlin".to_string(),
      destination: "Cairo".to_string(),
      wait_days: 14,
      status,
      created_at: Utc::now(),
      updated_at: Utc::now(),
    }
  }

  fn confirmation_for(order: &Order) -> Confirmation {
    Confirmation {
      order_id: order.id,
      shopper_id: order.shopper_id.clone(),
      traveler_id: UserId::from("traveler-1"),
      agreed_reward_cents: order.traveler_reward_cents,
      shopper: snapshot("shopper-1"),
      traveler: snapshot("traveler-1"),
      created_at: Utc::now(),
    }
  }

  fn set(statuses: &[OrderStatus]) -> BTreeSet<OrderStatus> {
    statuses.iter().copied().collect()
  }

  #[test]
  fn pending_creator_may_only_cancel() {
    let order = order_in(OrderStatus::Pending);
    let allowed = allowed_transitions(&order, None, &UserId::from("shopper-1"));
    assert_eq!(allowed, set(&[OrderStatus::Cancelled]));
  }

  #[test]
  fn pending_non_creator_may_only_accept() {
    let order = order_in(OrderStatus::Pending);
    let allowed = allowed_transitions(&order, None, &UserId::from("traveler-1"));
    assert_eq!(allowed, set(&[OrderStatus::Accepted]));
  }

  #[test]
  fn stranger_has_no_standing_after_acceptance() {
    let order = order_in(OrderStatus::Accepted);
    let confirmation = confirmation_for(&order);
    let allowed = allowed_transitions(&order, Some(&confirmation), &UserId::from("lurker"));
    assert!(allowed.is_empty());
  }

  #[test]
  fn confirmed_parties_need_the_confirmation_record() {
    let order = order_in(OrderStatus::Accepted);
    let allowed = allowed_transitions(&order, None, &UserId::from("traveler-1"));
    assert!(allowed.is_empty());
  }

  #[test]
  fn traveler_advances_the_fulfilment_chain() {
    let confirmation = confirmation_for(&order_in(OrderStatus::Accepted));
    let traveler = UserId::from("traveler-1");

    let cases = [
      (OrderStatus::Accepted, OrderStatus::Purchased),
      (OrderStatus::Paid, OrderStatus::Purchased),
      (OrderStatus::Purchased, OrderStatus::Intransit),
      (OrderStatus::Intransit, OrderStatus::Delivery),
    ];
    for (current, next) in cases {
      let order = order_in(current);
      let allowed = allowed_transitions(&order, Some(&confirmation), &traveler);
      assert_eq!(allowed, set(&[next, OrderStatus::Cancelled]), "from {current}");
    }
  }

  #[test]
  fn shopper_sets_paid_then_received() {
    let confirmation = confirmation_for(&order_in(OrderStatus::Accepted));
    let shopper = UserId::from("shopper-1");

    let order = order_in(OrderStatus::Accepted);
    assert_eq!(
      allowed_transitions(&order, Some(&confirmation), &shopper),
      set(&[OrderStatus::Paid, OrderStatus::Cancelled])
    );

    let order = order_in(OrderStatus::Delivery);
    assert_eq!(
      allowed_transitions(&order, Some(&confirmation), &shopper),
      set(&[OrderStatus::Received, OrderStatus::Cancelled])
    );

    // Mid-fulfilment the shopper can only cancel.
    let order = order_in(OrderStatus::Purchased);
    assert_eq!(
      allowed_transitions(&order, Some(&confirmation), &shopper),
      set(&[OrderStatus::Cancelled])
    );
  }

  #[test]
  fn terminal_states_admit_nothing() {
    for status in [OrderStatus::Received, OrderStatus::Cancelled] {
      let order = order_in(status);
      let confirmation = confirmation_for(&order);
      for user in ["shopper-1", "traveler-1", "lurker"] {
        let allowed = allowed_transitions(&order, Some(&confirmation), &UserId::from(user));
        assert!(allowed.is_empty(), "{status} should be terminal for {user}");
      }
    }
  }

  #[test]
  fn check_transition_rejects_without_mutating() {
    let order = order_in(OrderStatus::Pending);
    let err = check_transition(
      &order,
      None,
      &UserId::from("shopper-1"),
      OrderStatus::Accepted,
    )
    .unwrap_err();
    assert!(matches!(err, WayfareError::IllegalTransition { .. }));
  }

  #[test]
  fn cancelled_is_not_a_chain_position() {
    assert_eq!(progress(OrderStatus::Cancelled), Progress::Cancelled);
    assert_eq!(
      progress(OrderStatus::Pending),
      Progress::Step { position: 0, of: 7 }
    );
    assert_eq!(
      progress(OrderStatus::Received),
      Progress::Step { position: 6, of: 7 }
    );
  }
}
