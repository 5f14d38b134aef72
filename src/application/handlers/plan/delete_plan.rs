//! DeletePlanHandler - Soft-deletes a plan.

use std::sync::Arc;

use crate::domain::foundation::{Actor, PlanId, Timestamp};
use crate::domain::membership::{MembershipError, MembershipPlan};
use crate::ports::{AccessPolicy, UnitOfWorkFactory};

use super::load_live_plan;

#[derive(Debug, Clone)]
pub struct DeletePlanCommand {
    pub actor: Actor,
    pub plan_id: PlanId,
}

pub struct DeletePlanHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    access: Arc<dyn AccessPolicy>,
}

impl DeletePlanHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, access: Arc<dyn AccessPolicy>) -> Self {
        Self {
            uow_factory,
            access,
        }
    }

    pub async fn handle(&self, cmd: DeletePlanCommand) -> Result<MembershipPlan, MembershipError> {
        self.access.ensure_admin_full_access(&cmd.actor).await?;

        let mut uow = self.uow_factory.begin().await?;
        let mut plan = load_live_plan(uow.as_mut(), &cmd.actor, cmd.plan_id).await?;
        plan.soft_delete(Timestamp::now());
        uow.plans().update(&plan).await?;
        uow.commit().await?;

        tracing::info!(plan_id = %plan.id, name = %plan.name, "Plan deleted");
        Ok(plan)
    }
}
