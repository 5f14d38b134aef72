//! PurchaseAddOnHandler - Wallet-paid extras for members whose plan allows them.

use std::sync::Arc;

use crate::application::services::{wallet_ledger, PostCommit, SideEffects};
use crate::domain::foundation::{Actor, Money, Timestamp, UserId};
use crate::domain::invoice::{Invoice, InvoiceKind};
use crate::domain::membership::MembershipError;
use crate::domain::wallet::{WalletTransaction, WalletTransactionType};
use crate::ports::{AccessPolicy, UnitOfWorkFactory};

use super::{lock_member, WalletReceipt};

#[derive(Debug, Clone)]
pub struct PurchaseAddOnCommand {
    pub actor: Actor,
    pub member_id: UserId,
    pub amount: Money,
    pub description: String,
}

pub struct PurchaseAddOnHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    access: Arc<dyn AccessPolicy>,
    effects: SideEffects,
}

impl PurchaseAddOnHandler {
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

    pub async fn handle(&self, cmd: PurchaseAddOnCommand) -> Result<WalletReceipt, MembershipError> {
        self.access
            .ensure_member_owns_resource(&cmd.actor, cmd.member_id)
            .await?;
        let description = cmd.description.trim();
        if description.is_empty() {
            return Err(MembershipError::validation("description", "add-on description is required"));
        }

        let now = Timestamp::now();
        let mut uow = self.uow_factory.begin().await?;
        let member = lock_member(uow.as_mut(), &cmd.actor, cmd.member_id).await?;

        // The current plan must include add-on access
        let open = uow.memberships().find_open_for_member(cmd.member_id).await?;
        let membership = open.into_iter().next().ok_or_else(|| {
            MembershipError::validation("member_id", "add-ons require an open membership")
        })?;
        let plan = uow
            .plans()
            .find_by_id(membership.plan_id)
            .await?
            .ok_or_else(|| MembershipError::plan_not_found(membership.plan_id))?;
        if !plan.add_on_access {
            return Err(MembershipError::validation(
                "member_id",
                format!("plan {} does not include add-ons", plan.name),
            ));
        }

        let debit = WalletTransaction::debit(
            cmd.member_id,
            cmd.amount,
            WalletTransactionType::AddOnPurchase,
            Some(*membership.id.as_uuid()),
            description,
            cmd.actor.user_id,
            now,
        )?;
        let balance = wallet_ledger::checked_debit(uow.as_mut(), &debit).await?;

        let invoice = Invoice::issue(
            cmd.member_id,
            Some(membership.id),
            member.branch_id,
            InvoiceKind::AddOnPurchase,
            cmd.amount,
            description,
            now,
        );
        uow.invoices().insert(&invoice).await?;
        uow.commit().await?;

        tracing::info!(
            member_id = %cmd.member_id,
            amount = %cmd.amount,
            invoice = %invoice.number,
            "Add-on purchased"
        );

        let mut work = PostCommit::new();
        work.render(invoice);
        self.effects.dispatch(work).await;

        Ok(WalletReceipt {
            transaction: debit,
            balance,
        })
    }
}
