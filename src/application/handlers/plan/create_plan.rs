//! CreatePlanHandler - Adds a plan to the catalogue.

use std::sync::Arc;

use crate::domain::foundation::{ensure_branch_access, Actor, PlanId, Timestamp};
use crate::domain::membership::{MembershipError, MembershipPlan, PlanDetails};
use crate::ports::{AccessPolicy, UnitOfWorkFactory};

#[derive(Debug, Clone)]
pub struct CreatePlanCommand {
    pub actor: Actor,
    pub details: PlanDetails,
}

pub struct CreatePlanHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    access: Arc<dyn AccessPolicy>,
}

impl CreatePlanHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, access: Arc<dyn AccessPolicy>) -> Self {
        Self {
            uow_factory,
            access,
        }
    }

    pub async fn handle(&self, cmd: CreatePlanCommand) -> Result<MembershipPlan, MembershipError> {
        self.access.ensure_admin_full_access(&cmd.actor).await?;
        ensure_branch_access(&cmd.actor, cmd.details.branch_id)?;

        let plan = MembershipPlan::create(PlanId::new(), cmd.details, Timestamp::now())?;

        let mut uow = self.uow_factory.begin().await?;
        if uow.plans().find_by_name(&plan.name).await?.is_some() {
            return Err(MembershipError::duplicate_plan_name(&plan.name));
        }
        uow.plans().insert(&plan).await?;
        uow.commit().await?;

        tracing::info!(plan_id = %plan.id, name = %plan.name, price = %plan.price, "Plan created");
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Harness;
    use crate::domain::foundation::{BranchId, ErrorCode, UserId};
    use crate::domain::membership::plan::tests::details;

    fn create(actor: Actor, details: PlanDetails) -> CreatePlanCommand {
        CreatePlanCommand { actor, details }
    }

    #[tokio::test]
    async fn creates_plan_with_trimmed_name() {
        let h = Harness::new();
        let plan = CreatePlanHandler::new(h.factory(), h.access())
            .handle(create(Actor::platform_admin(UserId::new()), details("  Gold ", 100)))
            .await
            .unwrap();

        assert_eq!(plan.name, "Gold");
        assert!(h.store.snapshot().await.plans.contains_key(&plan.id));
    }

    #[tokio::test]
    async fn name_is_unique_ignoring_case() {
        let h = Harness::new();
        h.plan("Gold", 100).await;

        let err = CreatePlanHandler::new(h.factory(), h.access())
            .handle(create(Actor::platform_admin(UserId::new()), details("GOLD", 120)))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicatePlanName);
    }

    #[tokio::test]
    async fn invalid_details_are_rejected() {
        let h = Harness::new();
        let mut bad = details("Zero", 100);
        bad.duration_days = 0;

        let err = CreatePlanHandler::new(h.factory(), h.access())
            .handle(create(Actor::platform_admin(UserId::new()), bad))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::OutOfRange);
    }

    #[tokio::test]
    async fn branch_admin_creates_only_in_own_branch() {
        let h = Harness::new();
        let branch = BranchId::new();
        let admin = Actor::branch_admin(UserId::new(), branch);
        let handler = CreatePlanHandler::new(h.factory(), h.access());

        let err = handler
            .handle(create(admin.clone(), details("Global", 100)))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Forbidden);

        let mut local = details("Local", 100);
        local.branch_id = Some(branch);
        assert!(handler.handle(create(admin, local)).await.is_ok());
    }
}
