// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use std::sync::Arc;

use tracing::Level;
use wayfare::{
  ItemSpec, Marketplace, MemoryStore, OrderDraft, PayoutDetails, Profile, StaticIdentity,
  TransactionKind, UserId, WalletLedger,
};

// --- Common fixtures ---

pub fn profile(user: &str) -> Profile {
  Profile {
    user_id: UserId::from(user),
    display_name: format!("{user} (display)"),
    email: format!("{user}@example.com"),
    avatar_url: Some(format!("https://avatars.example.com/{user}.png")),
  }
}

/// A shared in-memory backend with profiles seeded for the given users.
pub fn seeded_store(users: &[&str]) -> Arc<MemoryStore> {
  let store = Arc::new(MemoryStore::new());
  for user in users {
    store.insert_profile(profile(user));
  }
  store
}

/// A marketplace facade acting as `user` over the shared store.
pub fn market(store: &Arc<MemoryStore>, user: &str) -> Marketplace {
  let identity = StaticIdentity::new(user, format!("{user}@example.com"));
  Marketplace::with_memory_store(store.clone(), Arc::new(identity))
}

pub fn draft(price_cents: i64, tax_estimate_cents: Option<i64>, reward_cents: i64) -> OrderDraft {
  OrderDraft {
    item: ItemSpec {
      name: "noise-cancelling headphones".to_string(),
      store_url: Some("https://shop.example.com/headphones".to_string()),
      quantity: 1,
    },
    price_cents,
    tax_estimate_cents,
    traveler_reward_cents: reward_cents,
    origin: "Berlin".to_string(),
    destination: "Cairo".to_string(),
    wait_days: 14,
  }
}

pub fn bank_details() -> PayoutDetails {
  PayoutDetails {
    bank_name: "First Example Bank".to_string(),
    account_holder: "T. Traveler".to_string(),
    account_number: "0012345678".to_string(),
    branch: "Main Street".to_string(),
  }
}

/// Seeds `cents` into a user's wallet through the normal ledger path.
pub async fn fund(store: &Arc<MemoryStore>, user: &str, cents: i64) {
  let ledger = WalletLedger::new(store.clone());
  ledger
    .credit(
      &UserId::from(user),
      cents,
      TransactionKind::Reward,
      "test seed",
      "seed",
    )
    .await
    .expect("seeding wallet");
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
