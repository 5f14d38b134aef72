//! AdjustWalletHandler - Signed manual correction by an admin.
//!
//! Negative adjustments are checked debits and can never overdraw.

use std::sync::Arc;

use crate::application::services::wallet_ledger;
use crate::domain::foundation::{Actor, Money, Timestamp, UserId};
use crate::domain::membership::MembershipError;
use crate::domain::wallet::{WalletTransaction, WalletTransactionType};
use crate::ports::{AccessPolicy, UnitOfWorkFactory};

use super::{lock_member, WalletReceipt};

#[derive(Debug, Clone)]
pub struct AdjustWalletCommand {
    pub actor: Actor,
    pub member_id: UserId,
    /// Signed; must not be zero.
    pub amount: Money,
    pub reason: String,
}

pub struct AdjustWalletHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    access: Arc<dyn AccessPolicy>,
}

impl AdjustWalletHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, access: Arc<dyn AccessPolicy>) -> Self {
        Self {
            uow_factory,
            access,
        }
    }

    pub async fn handle(&self, cmd: AdjustWalletCommand) -> Result<WalletReceipt, MembershipError> {
        self.access.ensure_admin_full_access(&cmd.actor).await?;
        if cmd.amount.is_zero() {
            return Err(MembershipError::validation("amount", "adjustment must not be zero"));
        }
        let reason = cmd.reason.trim();
        if reason.is_empty() {
            return Err(MembershipError::validation("reason", "adjustment reason is required"));
        }

        let now = Timestamp::now();
        let mut uow = self.uow_factory.begin().await?;
        lock_member(uow.as_mut(), &cmd.actor, cmd.member_id).await?;

        let (transaction, balance) = if cmd.amount.is_positive() {
            let credit = WalletTransaction::credit(
                cmd.member_id,
                cmd.amount,
                WalletTransactionType::ManualAdjustment,
                None,
                reason,
                cmd.actor.user_id,
                now,
            )?;
            let balance = wallet_ledger::append(uow.as_mut(), &credit).await?;
            (credit, balance)
        } else {
            let debit = WalletTransaction::debit(
                cmd.member_id,
                cmd.amount.abs(),
                WalletTransactionType::ManualAdjustment,
                None,
                reason,
                cmd.actor.user_id,
                now,
            )?;
            let balance = wallet_ledger::checked_debit(uow.as_mut(), &debit).await?;
            (debit, balance)
        };
        uow.commit().await?;

        tracing::info!(
            member_id = %cmd.member_id,
            amount = %cmd.amount,
            adjusted_by = %cmd.actor.user_id,
            "Wallet adjusted"
        );
        Ok(WalletReceipt {
            transaction,
            balance,
        })
    }
}
