//! MarkCommissionPaidHandler - Records a trainer payout.

use std::sync::Arc;

use crate::domain::commission::Commission;
use crate::domain::foundation::{Actor, BranchScoped, CommissionId, Timestamp};
use crate::domain::membership::MembershipError;
use crate::ports::{AccessPolicy, UnitOfWorkFactory};

#[derive(Debug, Clone)]
pub struct MarkCommissionPaidCommand {
    pub actor: Actor,
    pub commission_id: CommissionId,
}

pub struct MarkCommissionPaidHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    access: Arc<dyn AccessPolicy>,
}

impl MarkCommissionPaidHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, access: Arc<dyn AccessPolicy>) -> Self {
        Self {
            uow_factory,
            access,
        }
    }

    pub async fn handle(&self, cmd: MarkCommissionPaidCommand) -> Result<Commission, MembershipError> {
        self.access.ensure_admin_full_access(&cmd.actor).await?;

        let mut uow = self.uow_factory.begin().await?;
        let mut commission = uow
            .commissions()
            .find_for_update(cmd.commission_id)
            .await?
            .ok_or_else(|| MembershipError::commission_not_found(cmd.commission_id))?;
        commission.check_branch(&cmd.actor)?;

        commission.mark_paid(cmd.actor.user_id, Timestamp::now())?;
        uow.commissions().update(&commission).await?;
        uow.commit().await?;

        tracing::info!(
            commission_id = %commission.id,
            trainer_id = %commission.trainer_id,
            amount = %commission.amount,
            paid_by = %cmd.actor.user_id,
            "Commission paid out"
        );
        Ok(commission)
    }
}
