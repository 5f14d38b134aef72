//! Plan catalogue administration.

mod create_plan;
mod delete_plan;
mod list_plans;
mod update_plan;

pub use create_plan::{CreatePlanCommand, CreatePlanHandler};
pub use delete_plan::{DeletePlanCommand, DeletePlanHandler};
pub use list_plans::{ListPlansHandler, ListPlansQuery};
pub use update_plan::{UpdatePlanCommand, UpdatePlanHandler};

use crate::domain::foundation::{ensure_branch_access, Actor, PlanId};
use crate::domain::membership::{MembershipError, MembershipPlan};
use crate::ports::UnitOfWork;

/// Loads a plan that is still in the catalogue and in the actor's branch.
async fn load_live_plan(
    uow: &mut dyn UnitOfWork,
    actor: &Actor,
    id: PlanId,
) -> Result<MembershipPlan, MembershipError> {
    let plan = uow
        .plans()
        .find_by_id(id)
        .await?
        .filter(|p| !p.is_deleted)
        .ok_or_else(|| MembershipError::plan_not_found(id))?;
    ensure_branch_access(actor, plan.branch_id)?;
    Ok(plan)
}
