//! ListTrainerCommissionsHandler - A trainer's earned commissions.

use std::sync::Arc;

use crate::domain::commission::Commission;
use crate::domain::foundation::{Actor, BranchScoped, UserId};
use crate::domain::membership::MembershipError;
use crate::ports::{AccessPolicy, UnitOfWorkFactory};

#[derive(Debug, Clone)]
pub struct ListTrainerCommissionsQuery {
    pub actor: Actor,
    pub trainer_id: UserId,
    /// Only commissions not yet paid out.
    pub unpaid_only: bool,
}

pub struct ListTrainerCommissionsHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    access: Arc<dyn AccessPolicy>,
}

impl ListTrainerCommissionsHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, access: Arc<dyn AccessPolicy>) -> Self {
        Self {
            uow_factory,
            access,
        }
    }

    pub async fn handle(
        &self,
        query: ListTrainerCommissionsQuery,
    ) -> Result<Vec<Commission>, MembershipError> {
        self.access
            .ensure_trainer_owns_resource(&query.actor, query.trainer_id)
            .await?;

        let mut uow = self.uow_factory.begin().await?;
        let commissions = uow.commissions().list_for_trainer(query.trainer_id).await?;

        Ok(commissions
            .into_iter()
            .filter(|c| !query.unpaid_only || !c.is_paid)
            .filter(|c| c.check_branch(&query.actor).is_ok())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Harness;
    use crate::application::services::generate_commission;
    use crate::domain::commission::CommissionSource;
    use crate::domain::foundation::{ErrorCode, Money, Timestamp};
    use crate::ports::UnitOfWorkFactory;

    async fn earn(h: &Harness) -> UserId {
        let member = h.member(None).await;
        let trainer = h.trainer_for(member).await;
        let plan = h.plan("Gold", 100).await;
        let membership = h.active_membership(member, &plan, false).await;

        let mut uow = h.store.begin().await.unwrap();
        for source in [CommissionSource::Activation, CommissionSource::Renewal] {
            generate_commission(
                uow.as_mut(),
                &membership,
                &plan,
                Money::from_units(100),
                source,
                Timestamp::now(),
            )
            .await
            .unwrap();
        }
        uow.commit().await.unwrap();
        trainer
    }

    #[tokio::test]
    async fn trainer_lists_own_commissions() {
        let h = Harness::new();
        let trainer = earn(&h).await;

        let rows = ListTrainerCommissionsHandler::new(h.factory(), h.access())
            .handle(ListTrainerCommissionsQuery {
                actor: Actor::trainer(trainer, None),
                trainer_id: trainer,
                unpaid_only: true,
            })
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|c| c.amount == Money::from_units(10)));
    }

    #[tokio::test]
    async fn another_trainer_is_forbidden() {
        let h = Harness::new();
        let trainer = earn(&h).await;

        let err = ListTrainerCommissionsHandler::new(h.factory(), h.access())
            .handle(ListTrainerCommissionsQuery {
                actor: Actor::trainer(UserId::new(), None),
                trainer_id: trainer,
                unpaid_only: false,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
