//! ConfirmPaymentHandler - Admin approval of a pending membership payment.

use std::sync::Arc;

use crate::application::services::{
    load_snapshot, lock_membership, record_activation, wallet_ledger, MembershipSnapshot,
    PostCommit, SideEffects,
};
use crate::domain::foundation::{Actor, BranchScoped, MembershipId, Timestamp};
use crate::domain::membership::{MembershipError, MembershipStatus};
use crate::domain::wallet::{WalletTransaction, WalletTransactionType};
use crate::ports::{AccessPolicy, UnitOfWorkFactory};

/// Command to confirm the latest pending payment and activate the membership.
#[derive(Debug, Clone)]
pub struct ConfirmPaymentCommand {
    pub actor: Actor,
    pub membership_id: MembershipId,
}

pub struct ConfirmPaymentHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    access: Arc<dyn AccessPolicy>,
    effects: SideEffects,
}

impl ConfirmPaymentHandler {
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
        cmd: ConfirmPaymentCommand,
    ) -> Result<MembershipSnapshot, MembershipError> {
        // 1. Admin only
        self.access.ensure_admin_full_access(&cmd.actor).await?;

        let now = Timestamp::now();
        let mut uow = self.uow_factory.begin().await?;

        // 2. Lock the member, then the membership
        let mut membership = lock_membership(uow.as_mut(), cmd.membership_id)
            .await?
            .ok_or_else(|| MembershipError::not_found(cmd.membership_id))?;
        membership.check_branch(&cmd.actor)?;
        if membership.status != MembershipStatus::PendingPayment {
            return Err(MembershipError::invalid_state(
                membership.status.as_str(),
                "confirm payment for",
            ));
        }

        let mut payment = uow
            .payments()
            .find_latest_pending(membership.id)
            .await?
            .ok_or_else(|| MembershipError::payment_not_found(membership.id))?;

        let plan = uow
            .plans()
            .find_by_id(membership.plan_id)
            .await?
            .ok_or_else(|| MembershipError::plan_not_found(membership.plan_id))?;

        // 3. The payment plus any wallet share must cover the price
        let price = plan.effective_price();
        let total_paid = payment.amount + membership.wallet_contribution;
        if total_paid < price {
            return Err(MembershipError::validation(
                "amount",
                format!("payment total {} is below the price {}", total_paid, price),
            ));
        }

        // 4. Activate and settle
        membership.activate(plan.duration_days, total_paid, now)?;
        uow.memberships().update(&membership).await?;
        payment.confirm(cmd.actor.user_id, now)?;
        uow.payments().update(&payment).await?;

        let overpayment = total_paid - price;
        if overpayment.is_positive() {
            let credit = WalletTransaction::credit(
                membership.member_id,
                overpayment,
                WalletTransactionType::Overpayment,
                Some(*membership.id.as_uuid()),
                format!("Overpayment on {} membership", plan.name),
                cmd.actor.user_id,
                now,
            )?;
            wallet_ledger::append(uow.as_mut(), &credit).await?;
        }

        let mut work = PostCommit::new();
        record_activation(uow.as_mut(), &membership, &plan, total_paid, now, &mut work).await?;

        // 5. Commit, then side effects
        let snapshot = load_snapshot(uow.as_mut(), membership.id).await?;
        uow.commit().await?;

        tracing::info!(
            membership_id = %membership.id,
            payment_id = %payment.id,
            confirmed_by = %cmd.actor.user_id,
            "Membership payment confirmed"
        );
        self.effects.dispatch(work).await;

        Ok(snapshot)
    }
}
