//! GetMembershipHandler - Query for a membership snapshot.

use std::sync::Arc;

use crate::application::services::{load_snapshot, MembershipSnapshot};
use crate::domain::foundation::{Actor, BranchScoped, MembershipId};
use crate::domain::membership::MembershipError;
use crate::ports::{AccessPolicy, UnitOfWorkFactory};

#[derive(Debug, Clone)]
pub struct GetMembershipQuery {
    pub actor: Actor,
    pub membership_id: MembershipId,
}

pub struct GetMembershipHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    access: Arc<dyn AccessPolicy>,
}

impl GetMembershipHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, access: Arc<dyn AccessPolicy>) -> Self {
        Self {
            uow_factory,
            access,
        }
    }

    pub async fn handle(
        &self,
        query: GetMembershipQuery,
    ) -> Result<MembershipSnapshot, MembershipError> {
        let mut uow = self.uow_factory.begin().await?;
        let snapshot = load_snapshot(uow.as_mut(), query.membership_id).await?;

        self.access
            .ensure_member_owns_resource(&query.actor, snapshot.membership.member_id)
            .await?;
        snapshot.membership.check_branch(&query.actor)?;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Harness;
    use crate::domain::foundation::{ErrorCode, UserId};

    #[tokio::test]
    async fn owner_sees_snapshot() {
        let h = Harness::new();
        let member = h.member(None).await;
        let plan = h.plan("Gold", 100).await;
        let m = h.active_membership(member, &plan, false).await;

        let snap = GetMembershipHandler::new(h.factory(), h.access())
            .handle(GetMembershipQuery {
                actor: Actor::member(member, None),
                membership_id: m.id,
            })
            .await
            .unwrap();
        assert_eq!(snap.membership, m);
        assert!(snap.payments.is_empty());
        assert!(snap.latest_payment().is_none());
    }

    #[tokio::test]
    async fn stranger_is_forbidden_and_unknown_is_not_found() {
        let h = Harness::new();
        let member = h.member(None).await;
        let plan = h.plan("Gold", 100).await;
        let m = h.active_membership(member, &plan, false).await;
        let handler = GetMembershipHandler::new(h.factory(), h.access());

        let err = handler
            .handle(GetMembershipQuery {
                actor: Actor::member(UserId::new(), None),
                membership_id: m.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Forbidden);

        let err = handler
            .handle(GetMembershipQuery {
                actor: Actor::member(member, None),
                membership_id: MembershipId::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::MembershipNotFound);
    }
}
