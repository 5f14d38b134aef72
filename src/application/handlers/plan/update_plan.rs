//! UpdatePlanHandler - Edits a plan's attributes.
//!
//! Existing memberships keep their dates; price changes only affect future
//! purchases and renewals.

use std::sync::Arc;

use crate::domain::foundation::{ensure_branch_access, Actor, PlanId, Timestamp};
use crate::domain::membership::{MembershipError, MembershipPlan, PlanDetails};
use crate::ports::{AccessPolicy, UnitOfWorkFactory};

use super::load_live_plan;

#[derive(Debug, Clone)]
pub struct UpdatePlanCommand {
    pub actor: Actor,
    pub plan_id: PlanId,
    pub details: PlanDetails,
}

pub struct UpdatePlanHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    access: Arc<dyn AccessPolicy>,
}

impl UpdatePlanHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, access: Arc<dyn AccessPolicy>) -> Self {
        Self {
            uow_factory,
            access,
        }
    }

    pub async fn handle(&self, cmd: UpdatePlanCommand) -> Result<MembershipPlan, MembershipError> {
        self.access.ensure_admin_full_access(&cmd.actor).await?;
        ensure_branch_access(&cmd.actor, cmd.details.branch_id)?;

        let mut uow = self.uow_factory.begin().await?;
        let mut plan = load_live_plan(uow.as_mut(), &cmd.actor, cmd.plan_id).await?;

        if let Some(existing) = uow.plans().find_by_name(&cmd.details.name).await? {
            if existing.id != plan.id {
                return Err(MembershipError::duplicate_plan_name(cmd.details.name.trim()));
            }
        }

        plan.update(cmd.details, Timestamp::now())?;
        uow.plans().update(&plan).await?;
        uow.commit().await?;

        tracing::info!(plan_id = %plan.id, name = %plan.name, "Plan updated");
        Ok(plan)
    }
}
