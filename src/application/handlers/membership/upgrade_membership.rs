//! UpgradeMembershipHandler - Moves an active member to a pricier plan.
//!
//! The member pays the list-price difference from the wallet. The old
//! membership is cancelled and a fresh period starts on the new plan.
//! Upgrades never generate trainer commission.

use std::sync::Arc;

use crate::application::services::{
    load_snapshot, wallet_ledger, MembershipSnapshot, PostCommit, SideEffects,
};
use crate::domain::foundation::{Actor, BranchScoped, MembershipId, PlanId, Timestamp, UserId};
use crate::domain::invoice::{Invoice, InvoiceKind};
use crate::domain::membership::{Membership, MembershipError, MembershipStatus, NewMembership};
use crate::domain::notification::{Notification, NotificationKind};
use crate::domain::payment::{Payment, PaymentMethod};
use crate::domain::wallet::{WalletTransaction, WalletTransactionType};
use crate::ports::{AccessPolicy, UnitOfWorkFactory};

#[derive(Debug, Clone)]
pub struct UpgradeMembershipCommand {
    pub actor: Actor,
    pub member_id: UserId,
    pub new_plan_id: PlanId,
}

pub struct UpgradeMembershipHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    access: Arc<dyn AccessPolicy>,
    effects: SideEffects,
}

impl UpgradeMembershipHandler {
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
        cmd: UpgradeMembershipCommand,
    ) -> Result<MembershipSnapshot, MembershipError> {
        // 1. Authorize
        self.access
            .ensure_member_owns_resource(&cmd.actor, cmd.member_id)
            .await?;

        let now = Timestamp::now();
        let mut uow = self.uow_factory.begin().await?;

        // 2. Lock the member and find the single active membership
        let member = uow
            .members()
            .find_for_update(cmd.member_id)
            .await?
            .ok_or_else(|| MembershipError::member_not_found(cmd.member_id))?;
        member.check_branch(&cmd.actor)?;

        let open = uow.memberships().find_open_for_member(cmd.member_id).await?;
        let current_id = match open.as_slice() {
            [only] if only.status == MembershipStatus::Active => only.id,
            [only] => {
                return Err(MembershipError::invalid_state(
                    only.status.as_str(),
                    "upgrade",
                ))
            }
            _ => {
                return Err(MembershipError::validation(
                    "member_id",
                    "member has no active membership to upgrade",
                ))
            }
        };
        let mut current = uow
            .memberships()
            .find_for_update(current_id)
            .await?
            .filter(|m| m.status == MembershipStatus::Active)
            .ok_or_else(|| {
                MembershipError::validation("member_id", "member has no active membership to upgrade")
            })?;
        if current.is_lapsed(now) {
            return Err(MembershipError::validation(
                "member_id",
                "current membership period has already ended",
            ));
        }

        // 3. Compare plans on list price
        let current_plan = uow
            .plans()
            .find_by_id(current.plan_id)
            .await?
            .ok_or_else(|| MembershipError::plan_not_found(current.plan_id))?;
        let new_plan = uow
            .plans()
            .find_by_id(cmd.new_plan_id)
            .await?
            .filter(|p| !p.is_deleted)
            .ok_or_else(|| MembershipError::plan_not_found(cmd.new_plan_id))?;
        if !new_plan.is_active {
            return Err(MembershipError::validation("new_plan_id", "plan is not active"));
        }
        if !new_plan.is_available_in(member.branch_id) {
            return Err(MembershipError::branch_mismatch(
                "plan is not sold in the member's branch",
            ));
        }
        if new_plan.price <= current_plan.price {
            return Err(MembershipError::validation(
                "new_plan_id",
                format!(
                    "upgrade requires a plan priced above {} (got {})",
                    current_plan.price, new_plan.price
                ),
            ));
        }
        let difference = new_plan.price - current_plan.price;

        // 4. Cancel the old period, open the new one
        current.cancel(now)?;
        uow.memberships().update(&current).await?;

        let upgraded = Membership::open_active(
            NewMembership {
                id: MembershipId::new(),
                member_id: cmd.member_id,
                branch_id: current.branch_id,
                source: current.source,
                auto_renew: current.auto_renew,
            },
            &new_plan,
            difference,
            difference,
            now,
        );
        uow.memberships().insert(&upgraded).await?;

        // 5. Charge the wallet
        let debit = WalletTransaction::debit(
            cmd.member_id,
            difference,
            WalletTransactionType::MembershipUpgrade,
            Some(*upgraded.id.as_uuid()),
            format!("Upgrade {} -> {}", current_plan.name, new_plan.name),
            cmd.actor.user_id,
            now,
        )?;
        wallet_ledger::checked_debit(uow.as_mut(), &debit).await?;

        let payment = Payment::settled(
            upgraded.id,
            cmd.member_id,
            difference,
            PaymentMethod::Wallet,
            None,
            now,
        );
        uow.payments().insert(&payment).await?;

        let invoice = Invoice::issue(
            cmd.member_id,
            Some(upgraded.id),
            upgraded.branch_id,
            InvoiceKind::Upgrade,
            difference,
            format!("Upgrade {} -> {}", current_plan.name, new_plan.name),
            now,
        );
        uow.invoices().insert(&invoice).await?;

        // 6. Commit, then side effects
        let snapshot = load_snapshot(uow.as_mut(), upgraded.id).await?;
        uow.commit().await?;

        tracing::info!(
            member_id = %cmd.member_id,
            from = %current.id,
            to = %upgraded.id,
            difference = %difference,
            "Membership upgraded"
        );

        let mut work = PostCommit::new();
        work.render(invoice);
        work.notify(Notification::new(
            cmd.member_id,
            NotificationKind::MembershipActivated,
            "Membership upgraded",
            format!("You are now on {}", new_plan.name),
        ));
        self.effects.dispatch(work).await;

        Ok(snapshot)
    }
}
