// wayfare_core/examples/order_lifecycle.rs

use std::sync::Arc;

use tracing::info;
use wayfare::{
  guard, ItemSpec, Marketplace, MemoryStore, OrderDraft, OrderStatus, Profile, StaticIdentity,
  UserId, WayfareError,
};

fn profile(user: &str, name: &str) -> Profile {
  Profile {
    user_id: UserId::from(user),
    display_name: name.to_string(),
    email: format!("{user}@example.com"),
    avatar_url: None,
  }
}

#[tokio::main]
async fn main() -> Result<(), WayfareError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Order Lifecycle Example ---");

  // One shared backend, one marketplace handle per device.
  let store = Arc::new(MemoryStore::new());
  store.insert_profile(profile("sara", "Sara the Shopper"));
  store.insert_profile(profile("timo", "Timo the Traveler"));

  let shopper = Marketplace::with_memory_store(
    store.clone(),
    Arc::new(StaticIdentity::new("sara", "sara@example.com")),
  );
  let traveler = Marketplace::with_memory_store(
    store.clone(),
    Arc::new(StaticIdentity::new("timo", "timo@example.com")),
  );

  // Sara posts a purchase request.
  let order = shopper
    .create_order(OrderDraft {
      item: ItemSpec {
        name: "mechanical keyboard".to_string(),
        store_url: Some("https://shop.example.com/kb".to_string()),
        quantity: 1,
      },
      price_cents: 12_000,
      tax_estimate_cents: None,
      traveler_reward_cents: 1_500,
      origin: "Tokyo".to_string(),
      destination: "Lisbon".to_string(),
      wait_days: 21,
    })
    .await?;
  info!(
    "order {} created: estimated total {} cents",
    order.id, order.estimated_total_cents
  );

  // Timo browses open requests and accepts one.
  let open = traveler.browse_requests().await?;
  info!("{} open request(s)", open.len());
  let confirmation = traveler.confirm_order(order.id).await?;
  info!(
    "confirmed by {} for {}; wallet now holds {} cents",
    confirmation.traveler.display_name,
    confirmation.shopper.display_name,
    traveler.wallet_balance().await?
  );

  // Both parties drive the status forward, each on their own device.
  shopper.update_status(order.id, OrderStatus::Paid).await?;
  traveler.update_status(order.id, OrderStatus::Purchased).await?;
  traveler.update_status(order.id, OrderStatus::Intransit).await?;
  traveler.update_status(order.id, OrderStatus::Delivery).await?;
  let done = shopper.update_status(order.id, OrderStatus::Received).await?;

  match guard::progress(done.status) {
    guard::Progress::Step { position, of } => {
      info!("order finished at step {}/{}", position + 1, of)
    }
    guard::Progress::Cancelled => info!("order was cancelled"),
  }

  Ok(())
}
