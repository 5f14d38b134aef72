//! RejectPaymentHandler - Admin rejection of a pending membership payment.
//!
//! The membership stays in `PendingPayment` so the member can submit a new
//! proof. Any wallet share already taken is refunded.

use std::sync::Arc;

use crate::application::services::{
    load_snapshot, lock_membership, wallet_ledger, MembershipSnapshot, PostCommit, SideEffects,
};
use crate::domain::foundation::{Actor, BranchScoped, MembershipId, Timestamp};
use crate::domain::membership::{MembershipError, MembershipStatus};
use crate::domain::notification::{Notification, NotificationKind};
use crate::domain::wallet::{WalletTransaction, WalletTransactionType};
use crate::ports::{AccessPolicy, UnitOfWorkFactory};

#[derive(Debug, Clone)]
pub struct RejectPaymentCommand {
    pub actor: Actor,
    pub membership_id: MembershipId,
    pub reason: String,
}

pub struct RejectPaymentHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    access: Arc<dyn AccessPolicy>,
    effects: SideEffects,
}

impl RejectPaymentHandler {
    pub fn new(
        uow_factory: Arc<dyn UnitOfWorkFactory>,
        access: Arc<dyn AccessPolicy>,
        effects: SideEffects,
    ) -> Self {
        Self {
            uow_factory,
            access,
            effects,
        }
    }

    pub async fn handle(
        &self,
        cmd: RejectPaymentCommand,
    ) -> Result<MembershipSnapshot, MembershipError> {
        // 1. Admin only, with a reason
        self.access.ensure_admin_full_access(&cmd.actor).await?;
        let reason = cmd.reason.trim();
        if reason.is_empty() {
            return Err(MembershipError::validation("reason", "rejection reason is required"));
        }

        let now = Timestamp::now();
        let mut uow = self.uow_factory.begin().await?;

        // 2. Lock the member, then the membership and find the payment under review
        let mut membership = lock_membership(uow.as_mut(), cmd.membership_id)
            .await?
            .ok_or_else(|| MembershipError::not_found(cmd.membership_id))?;
        membership.check_branch(&cmd.actor)?;
        if membership.status != MembershipStatus::PendingPayment {
            return Err(MembershipError::invalid_state(
                membership.status.as_str(),
                "reject payment for",
            ));
        }

        let mut payment = uow
            .payments()
            .find_latest_pending(membership.id)
            .await?
            .ok_or_else(|| MembershipError::payment_not_found(membership.id))?;

        // 3. Reject, refund the wallet share, reset the membership
        payment.reject(cmd.actor.user_id, reason, now)?;
        uow.payments().update(&payment).await?;

        let refund = membership.reset_to_pending(now)?;
        uow.memberships().update(&membership).await?;
        if refund.is_positive() {
            let credit = WalletTransaction::credit(
                membership.member_id,
                refund,
                WalletTransactionType::Refund,
                Some(*payment.id.as_uuid()),
                "Refund for rejected membership payment",
                cmd.actor.user_id,
                now,
            )?;
            wallet_ledger::append(uow.as_mut(), &credit).await?;
        }

        // 4. Commit, then notify the member
        let snapshot = load_snapshot(uow.as_mut(), membership.id).await?;
        uow.commit().await?;

        tracing::info!(
            membership_id = %membership.id,
            payment_id = %payment.id,
            rejected_by = %cmd.actor.user_id,
            refund = %refund,
            "Membership payment rejected"
        );

        let mut work = PostCommit::new();
        work.notify(Notification::new(
            membership.member_id,
            NotificationKind::PaymentRejected,
            "Payment rejected",
            format!("Your payment was rejected: {}", reason),
        ));
        self.effects.dispatch(work).await;

        Ok(snapshot)
    }
}
