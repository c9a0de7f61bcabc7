// src/lib.rs

//! Wayfare: order lifecycle and wallet ledger core for a peer-to-peer
//! delivery marketplace.
//!
//! Shoppers post purchase requests, travelers accept them, and a wallet
//! subsystem settles rewards. This crate owns the parts with real invariants:
//!  - A role-gated status state machine (`pending -> accepted -> paid ->
//!    purchased -> intransit -> delivery -> received`, with `cancelled`
//!    absorbing), enforced by the transition guard and conditional writes.
//!  - A per-user wallet ledger whose balance always equals the fold of its
//!    append-only transaction history and never goes negative.
//!  - An idempotent reward payout trigger crediting the traveler exactly once
//!    per confirmed order, even under at-least-once event delivery.
//!  - A payout request flow debiting the balance towards an external transfer.
//!
//! Storage, identity, and notifications are trait seams; construct a
//! [`Marketplace`] per process from your adapters (or [`MemoryStore`] in
//! tests) and pass it by reference.

pub mod cashout;
pub mod confirm;
pub mod error;
pub mod guard;
pub mod identity;
pub mod ledger;
pub mod marketplace;
pub mod model;
pub mod pricing;
pub mod reward;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::model::confirmation::{Confirmation, PartySnapshot};
pub use crate::model::order::{ItemSpec, Order, OrderDraft, OrderId, OrderStatus};
pub use crate::model::user::{Profile, UserId};
pub use crate::model::wallet::{PayoutDetails, TransactionKind, WalletTransaction};

pub use crate::guard::{allowed_transitions, check_transition, progress, Progress, STATUS_CHAIN};
pub use crate::pricing::{estimated_total, quote_fees, FeeBreakdown};

pub use crate::cashout::PayoutRequestFlow;
pub use crate::confirm::ConfirmationLinker;
pub use crate::ledger::{replay_balance, WalletLedger};
pub use crate::reward::{OrderConfirmed, RewardPayoutTrigger};

pub use crate::identity::{Identity, StaticIdentity};
pub use crate::store::{
  ConfirmationStore, MemoryStore, NotificationSink, OrderStore, PayoutMethodStore, ProfileStore,
  StoreError, StoreResult, WalletStore,
};

pub use crate::error::{WayfareError, WayfareResult};

// The single entry point most callers need.
pub use crate::marketplace::Marketplace;
