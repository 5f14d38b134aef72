//! Wallet ledger domain.
//!
//! A member's wallet is an append-only list of signed transactions.
//! The balance is always the sum of amounts; nothing else is trusted.

mod transaction;

pub use transaction::{balance_of, WalletTransaction, WalletTransactionType};
