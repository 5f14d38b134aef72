//! ChargeSessionBookingHandler - Wallet charge for a booked training session.
//!
//! The member row is not locked here. Two bookings racing on the same wallet
//! are reconciled after the insert: the loser's debit is reversed in the same
//! unit of work, the reversal is committed, and the caller gets a retryable
//! `ConcurrentDebit`.

use std::sync::Arc;

use crate::application::services::wallet_ledger::{self, DebitOutcome};
use crate::domain::foundation::{Actor, BranchScoped, Money, Timestamp, UserId};
use crate::domain::membership::MembershipError;
use crate::domain::wallet::{WalletTransaction, WalletTransactionType};
use crate::ports::{AccessPolicy, UnitOfWorkFactory};

use super::WalletReceipt;

#[derive(Debug, Clone)]
pub struct ChargeSessionBookingCommand {
    pub actor: Actor,
    pub member_id: UserId,
    pub amount: Money,
    /// Caller's booking reference, kept in the ledger description.
    pub session_ref: String,
}

pub struct ChargeSessionBookingHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    access: Arc<dyn AccessPolicy>,
}

impl ChargeSessionBookingHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, access: Arc<dyn AccessPolicy>) -> Self {
        Self {
            uow_factory,
            access,
        }
    }

    pub async fn handle(
        &self,
        cmd: ChargeSessionBookingCommand,
    ) -> Result<WalletReceipt, MembershipError> {
        self.access
            .ensure_member_owns_resource(&cmd.actor, cmd.member_id)
            .await?;
        let session_ref = cmd.session_ref.trim();
        if session_ref.is_empty() {
            return Err(MembershipError::validation("session_ref", "session reference is required"));
        }

        let mut uow = self.uow_factory.begin().await?;
        let member = uow
            .members()
            .find_by_id(cmd.member_id)
            .await?
            .ok_or_else(|| MembershipError::member_not_found(cmd.member_id))?;
        member.check_branch(&cmd.actor)?;

        let debit = WalletTransaction::debit(
            cmd.member_id,
            cmd.amount,
            WalletTransactionType::SessionBooking,
            None,
            format!("Session booking {}", session_ref),
            cmd.actor.user_id,
            Timestamp::now(),
        )?;

        // Plain overdrafts fail before anything is written
        let available = uow.wallet().balance(cmd.member_id).await?;
        if available < cmd.amount {
            return Err(MembershipError::insufficient_funds(cmd.amount, available));
        }

        match wallet_ledger::optimistic_debit(uow.as_mut(), &debit).await? {
            DebitOutcome::Applied(balance) => {
                uow.commit().await?;
                tracing::info!(
                    member_id = %cmd.member_id,
                    amount = %cmd.amount,
                    session_ref = %session_ref,
                    balance = %balance,
                    "Session booking charged"
                );
                Ok(WalletReceipt {
                    transaction: debit,
                    balance,
                })
            }
            DebitOutcome::Compensated => {
                uow.commit().await?;
                Err(MembershipError::concurrent_debit(cmd.member_id))
            }
        }
    }
}
