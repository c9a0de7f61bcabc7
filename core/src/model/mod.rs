// wayfare_core/src/model/mod.rs

//! Persistent domain records: orders, confirmations, wallet entries, and the
//! profile/payout structures snapshotted or referenced by them.

pub mod confirmation;
pub mod order;
pub mod user;
pub mod wallet;

pub use confirmation::{Confirmation, PartySnapshot};
pub use order::{ItemSpec, Order, OrderDraft, OrderId, OrderStatus};
pub use user::{Profile, UserId};
pub use wallet::{PayoutDetails, TransactionKind, WalletTransaction};
