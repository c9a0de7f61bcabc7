// wayfare_core/examples/wallet_cashout.rs

use std::sync::Arc;

use tracing::info;
use wayfare::{
  ItemSpec, Marketplace, MemoryStore, OrderDraft, PayoutDetails, Profile, StaticIdentity, UserId,
  WayfareError,
};

#[tokio::main]
async fn main() -> Result<(), WayfareError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Wallet Cash-Out Example ---");

  let store = Arc::new(MemoryStore::new());
  for (user, name) in [("sara", "Sara"), ("timo", "Timo")] {
    store.insert_profile(Profile {
      user_id: UserId::from(user),
      display_name: name.to_string(),
      email: format!("{user}@example.com"),
      avatar_url: None,
    });
  }

  let shopper = Marketplace::with_memory_store(
    store.clone(),
    Arc::new(StaticIdentity::new("sara", "sara@example.com")),
  );
  let traveler = Marketplace::with_memory_store(
    store.clone(),
    Arc::new(StaticIdentity::new("timo", "timo@example.com")),
  );

  // Earn a reward the normal way: accept an order.
  let order = shopper
    .create_order(OrderDraft {
      item: ItemSpec {
        name: "espresso machine".to_string(),
        store_url: None,
        quantity: 1,
      },
      price_cents: 30_000,
      tax_estimate_cents: Some(4_500),
      traveler_reward_cents: 3_000,
      origin: "Milan".to_string(),
      destination: "Oslo".to_string(),
      wait_days: 10,
    })
    .await?;
  traveler.confirm_order(order.id).await?;
  info!("wallet after reward: {} cents", traveler.wallet_balance().await?);

  // Cash part of it out.
  let payout = traveler
    .request_payout(
      20_000,
      PayoutDetails {
        bank_name: "Fjord Savings".to_string(),
        account_holder: "Timo T.".to_string(),
        account_number: "4242424242".to_string(),
        branch: "Oslo Central".to_string(),
      },
    )
    .await?;
  info!("payout recorded: {} ({} cents)", payout.id, payout.amount_cents);

  info!("wallet after payout: {} cents", traveler.wallet_balance().await?);
  for txn in traveler.wallet_history().await? {
    info!("  {} {} {} cents: {}", txn.created_at, txn.kind, txn.amount_cents, txn.description);
  }

  Ok(())
}
