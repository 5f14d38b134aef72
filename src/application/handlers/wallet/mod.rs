//! Wallet handlers.
//!
//! ## Commands
//! - Top-ups and manual adjustments (admin)
//! - Session booking charges (optimistic debit)
//! - Add-on purchases (checked debit + invoice)
//!
//! ## Queries
//! - Wallet statement

mod adjust_wallet;
mod charge_session_booking;
mod get_wallet_statement;
mod purchase_add_on;
mod top_up_wallet;

use serde::Serialize;

use crate::domain::foundation::{Actor, BranchScoped, Money, UserId};
use crate::domain::membership::MembershipError;
use crate::domain::people::UserAccount;
use crate::domain::wallet::WalletTransaction;
use crate::ports::UnitOfWork;

pub use adjust_wallet::{AdjustWalletCommand, AdjustWalletHandler};
pub use charge_session_booking::{ChargeSessionBookingCommand, ChargeSessionBookingHandler};
pub use get_wallet_statement::{GetWalletStatementHandler, GetWalletStatementQuery};
pub use purchase_add_on::{PurchaseAddOnCommand, PurchaseAddOnHandler};
pub use top_up_wallet::{TopUpWalletCommand, TopUpWalletHandler};

/// Ledger state after a wallet mutation committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletReceipt {
    pub transaction: WalletTransaction,
    pub balance: Money,
}

/// Recomputed balance and full history, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletStatement {
    pub member_id: UserId,
    pub balance: Money,
    pub transactions: Vec<WalletTransaction>,
}

/// Locks and returns a member account the actor may act on.
async fn lock_member(
    uow: &mut dyn UnitOfWork,
    actor: &Actor,
    member_id: UserId,
) -> Result<UserAccount, MembershipError> {
    let member = uow
        .members()
        .find_for_update(member_id)
        .await?
        .ok_or_else(|| MembershipError::member_not_found(member_id))?;
    if member.member_profile().is_none() {
        return Err(MembershipError::validation("member_id", "user is not a member"));
    }
    member.check_branch(actor)?;
    Ok(member)
}
