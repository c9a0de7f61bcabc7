// tests/ledger_tests.rs
mod common;

use std::sync::Arc;

use common::*;
use proptest::prelude::*;
use serial_test::serial;
use wayfare::{
  replay_balance, MemoryStore, TransactionKind, UserId, WalletLedger, WayfareError,
};

fn ledger_for(store: &Arc<MemoryStore>) -> WalletLedger {
  WalletLedger::new(store.clone())
}

#[tokio::test]
#[serial]
async fn balance_tracks_credits_and_debits() {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let ledger = ledger_for(&store);
  let user = UserId::from("alice");

  ledger
    .credit(&user, 10_000, TransactionKind::Reward, "reward one", "order-1")
    .await
    .unwrap();
  assert_eq!(ledger.balance(&user).await.unwrap(), 10_000);

  ledger
    .credit(&user, 2_500, TransactionKind::Reward, "reward two", "order-2")
    .await
    .unwrap();
  assert_eq!(ledger.balance(&user).await.unwrap(), 12_500);

  ledger
    .debit(&user, 4_000, TransactionKind::Transfer, "cash out", "bank:demo")
    .await
    .unwrap();
  assert_eq!(ledger.balance(&user).await.unwrap(), 8_500);

  let history = ledger.history(&user).await.unwrap();
  assert_eq!(history.len(), 3);
  assert_eq!(replay_balance(&history), 8_500);
  // Newest first.
  assert_eq!(history[0].kind, TransactionKind::Transfer);
  assert_eq!(history[2].source, "order-1");
}

#[tokio::test]
#[serial]
async fn overdraft_fails_and_writes_nothing() {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let ledger = ledger_for(&store);
  let user = UserId::from("bob");

  ledger
    .credit(&user, 5_000, TransactionKind::Reward, "seed", "order-9")
    .await
    .unwrap();

  let err = ledger
    .debit(&user, 5_001, TransactionKind::Transfer, "too much", "bank:demo")
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    WayfareError::InsufficientFunds {
      requested_cents: 5_001,
      available_cents: 5_000,
      ..
    }
  ));

  // Balance and history untouched by the failed debit.
  assert_eq!(ledger.balance(&user).await.unwrap(), 5_000);
  assert_eq!(ledger.history(&user).await.unwrap().len(), 1);
}

#[tokio::test]
#[serial]
async fn zero_and_negative_amounts_are_rejected() {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let ledger = ledger_for(&store);
  let user = UserId::from("carol");

  for amount in [0, -1, -10_000] {
    let err = ledger
      .credit(&user, amount, TransactionKind::Reward, "bad", "x")
      .await
      .unwrap_err();
    assert!(matches!(err, WayfareError::InvalidAmount { .. }));

    let err = ledger
      .debit(&user, amount, TransactionKind::Transfer, "bad", "x")
      .await
      .unwrap_err();
    assert!(matches!(err, WayfareError::InvalidAmount { .. }));
  }

  assert_eq!(ledger.balance(&user).await.unwrap(), 0);
  assert!(ledger.history(&user).await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn kind_direction_mismatch_is_an_internal_error() {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let ledger = ledger_for(&store);
  let user = UserId::from("dave");

  let err = ledger
    .credit(&user, 100, TransactionKind::Transfer, "wrong", "x")
    .await
    .unwrap_err();
  assert!(matches!(err, WayfareError::Internal(_)));

  let err = ledger
    .debit(&user, 100, TransactionKind::Reward, "wrong", "x")
    .await
    .unwrap_err();
  assert!(matches!(err, WayfareError::Internal(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn concurrent_credits_lose_no_updates() {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let user = UserId::from("erin");

  let mut handles = Vec::new();
  for i in 0..6 {
    let ledger = ledger_for(&store);
    let user = user.clone();
    handles.push(tokio::spawn(async move {
      ledger
        .credit(
          &user,
          1_000,
          TransactionKind::Reward,
          "concurrent credit",
          &format!("order-{i}"),
        )
        .await
    }));
  }
  for handle in handles {
    handle.await.unwrap().unwrap();
  }

  let ledger = ledger_for(&store);
  assert_eq!(ledger.balance(&user).await.unwrap(), 6_000);
  let history = ledger.history(&user).await.unwrap();
  assert_eq!(history.len(), 6);
  assert_eq!(replay_balance(&history), 6_000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn concurrent_debits_never_overdraw() {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let user = UserId::from("frank");
  fund(&store, "frank", 3_000).await;

  // Five debits of 1000 against a balance of 3000: exactly three can land.
  let mut handles = Vec::new();
  for _ in 0..5 {
    let ledger = ledger_for(&store);
    let user = user.clone();
    handles.push(tokio::spawn(async move {
      ledger
        .debit(&user, 1_000, TransactionKind::Transfer, "race", "bank:demo")
        .await
    }));
  }

  let mut succeeded = 0;
  for handle in handles {
    match handle.await.unwrap() {
      Ok(_) => succeeded += 1,
      Err(WayfareError::InsufficientFunds { .. }) => {}
      Err(other) => panic!("unexpected error: {other}"),
    }
  }

  assert_eq!(succeeded, 3);
  let ledger = ledger_for(&store);
  assert_eq!(ledger.balance(&user).await.unwrap(), 0);
  let history = ledger.history(&user).await.unwrap();
  assert_eq!(replay_balance(&history), 0);
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(64))]

  // Any interleaving of credits and attempted debits keeps the balance equal
  // to the fold of the history, and never negative.
  #[test]
  fn history_fold_reproduces_balance(
    ops in proptest::collection::vec((any::<bool>(), 1i64..5_000), 1..40)
  ) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async move {
      let store = Arc::new(MemoryStore::new());
      let ledger = WalletLedger::new(store.clone());
      let user = UserId::from("prop-user");

      for (idx, (is_credit, amount)) in ops.into_iter().enumerate() {
        if is_credit {
          ledger
            .credit(&user, amount, TransactionKind::Reward, "prop credit", &format!("order-{idx}"))
            .await
            .unwrap();
        } else {
          match ledger
            .debit(&user, amount, TransactionKind::Transfer, "prop debit", "bank:prop")
            .await
          {
            Ok(_) => {}
            Err(WayfareError::InsufficientFunds { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
          }
        }

        let balance = ledger.balance(&user).await.unwrap();
        let history = ledger.history(&user).await.unwrap();
        prop_assert_eq!(balance, replay_balance(&history));
        prop_assert!(balance >= 0);
      }
      Ok(())
    })?;
  }
}
