//! TopUpWalletHandler - Admin credit to a member wallet.

use std::sync::Arc;

use crate::application::services::wallet_ledger;
use crate::domain::foundation::{Actor, Money, Timestamp, UserId};
use crate::domain::membership::MembershipError;
use crate::domain::wallet::{WalletTransaction, WalletTransactionType};
use crate::ports::{AccessPolicy, UnitOfWorkFactory};

use super::{lock_member, WalletReceipt};

#[derive(Debug, Clone)]
pub struct TopUpWalletCommand {
    pub actor: Actor,
    pub member_id: UserId,
    pub amount: Money,
    pub description: Option<String>,
}

pub struct TopUpWalletHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    access: Arc<dyn AccessPolicy>,
}

impl TopUpWalletHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, access: Arc<dyn AccessPolicy>) -> Self {
        Self {
            uow_factory,
            access,
        }
    }

    pub async fn handle(&self, cmd: TopUpWalletCommand) -> Result<WalletReceipt, MembershipError> {
        self.access.ensure_admin_full_access(&cmd.actor).await?;

        let mut uow = self.uow_factory.begin().await?;
        lock_member(uow.as_mut(), &cmd.actor, cmd.member_id).await?;

        let credit = WalletTransaction::credit(
            cmd.member_id,
            cmd.amount,
            WalletTransactionType::Credit,
            None,
            cmd.description.unwrap_or_else(|| "Wallet top-up".to_string()),
            cmd.actor.user_id,
            Timestamp::now(),
        )?;
        let balance = wallet_ledger::append(uow.as_mut(), &credit).await?;
        uow.commit().await?;

        tracing::info!(member_id = %cmd.member_id, amount = %cmd.amount, balance = %balance, "Wallet topped up");
        Ok(WalletReceipt {
            transaction: credit,
            balance,
        })
    }
}
