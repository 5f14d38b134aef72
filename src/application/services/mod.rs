//! Services shared across handlers.
//!
//! - `activation` - commission, invoice and notice for a paid activation
//! - `locking` - member-then-membership lock order
//! - `wallet_ledger` - ledger appends, checked and optimistic debits
//! - `commission_engine` - deduplicated trainer commissions
//! - `side_effects` - post-commit notifications and invoice rendering
//! - `snapshot` - membership + payments read model

mod activation;
mod commission_engine;
mod locking;
mod side_effects;
mod snapshot;
pub mod wallet_ledger;

pub use activation::record_activation;
pub use commission_engine::generate_commission;
pub use locking::lock_membership;
pub use side_effects::{PostCommit, SideEffects};
pub use snapshot::{load_snapshot, MembershipSnapshot};
pub use wallet_ledger::DebitOutcome;
