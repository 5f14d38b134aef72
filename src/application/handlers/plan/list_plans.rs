//! ListPlansHandler - The catalogue as visible to an actor.
//!
//! Admins see every live plan they can sell, including inactive ones.
//! Everyone else sees only purchasable plans sold in their branch.

use std::sync::Arc;

use crate::domain::foundation::Actor;
use crate::domain::membership::{MembershipError, MembershipPlan};
use crate::ports::UnitOfWorkFactory;

#[derive(Debug, Clone)]
pub struct ListPlansQuery {
    pub actor: Actor,
}

pub struct ListPlansHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
}

impl ListPlansHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { uow_factory }
    }

    pub async fn handle(&self, query: ListPlansQuery) -> Result<Vec<MembershipPlan>, MembershipError> {
        let mut uow = self.uow_factory.begin().await?;
        let plans = uow.plans().list().await?;

        let actor = &query.actor;
        Ok(plans
            .into_iter()
            .filter(|p| {
                if actor.is_admin() || actor.is_system() {
                    actor.is_platform_wide() || p.is_available_in(actor.branch_id)
                } else {
                    p.is_purchasable() && p.is_available_in(actor.branch_id)
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Harness;
    use crate::domain::foundation::{BranchId, UserId};
    use crate::domain::membership::plan::tests::details;

    #[tokio::test]
    async fn members_see_purchasable_plans_for_their_branch() {
        let h = Harness::new();
        let branch = BranchId::new();
        h.plan("Global", 100).await;
        let mut local = details("Local", 90);
        local.branch_id = Some(branch);
        h.plan_with(local).await;
        let mut elsewhere = details("Elsewhere", 90);
        elsewhere.branch_id = Some(BranchId::new());
        h.plan_with(elsewhere).await;
        let mut paused = details("Paused", 50);
        paused.is_active = false;
        h.plan_with(paused).await;

        let handler = ListPlansHandler::new(h.factory());
        let names = |plans: Vec<MembershipPlan>| {
            plans.into_iter().map(|p| p.name).collect::<Vec<_>>()
        };

        let member_view = handler
            .handle(ListPlansQuery {
                actor: Actor::member(UserId::new(), Some(branch)),
            })
            .await
            .unwrap();
        assert_eq!(names(member_view), vec!["Global", "Local"]);

        let admin_view = handler
            .handle(ListPlansQuery {
                actor: Actor::platform_admin(UserId::new()),
            })
            .await
            .unwrap();
        assert_eq!(admin_view.len(), 4);
    }
}
