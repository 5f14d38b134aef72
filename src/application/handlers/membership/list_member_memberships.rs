//! ListMemberMembershipsHandler - A member's membership history, newest first.

use std::sync::Arc;

use crate::domain::foundation::{Actor, BranchScoped, UserId};
use crate::domain::membership::{Membership, MembershipError};
use crate::ports::{AccessPolicy, UnitOfWorkFactory};

#[derive(Debug, Clone)]
pub struct ListMemberMembershipsQuery {
    pub actor: Actor,
    pub member_id: UserId,
}

pub struct ListMemberMembershipsHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    access: Arc<dyn AccessPolicy>,
}

impl ListMemberMembershipsHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, access: Arc<dyn AccessPolicy>) -> Self {
        Self {
            uow_factory,
            access,
        }
    }

    pub async fn handle(
        &self,
        query: ListMemberMembershipsQuery,
    ) -> Result<Vec<Membership>, MembershipError> {
        self.access
            .ensure_member_owns_resource(&query.actor, query.member_id)
            .await?;

        let mut uow = self.uow_factory.begin().await?;
        let member = uow
            .members()
            .find_by_id(query.member_id)
            .await?
            .ok_or_else(|| MembershipError::member_not_found(query.member_id))?;
        member.check_branch(&query.actor)?;

        Ok(uow.memberships().list_for_member(query.member_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Harness;
    use crate::domain::foundation::{ErrorCode, Timestamp};

    #[tokio::test]
    async fn history_is_newest_first() {
        let h = Harness::new();
        let member = h.member(None).await;
        let plan = h.plan("Gold", 100).await;
        let mut old = h.active_membership(member, &plan, false).await;
        old.created_at = Timestamp::now().minus_days(60);
        old.cancel(Timestamp::now()).unwrap();
        h.save_membership(&old).await;
        let current = h.active_membership(member, &plan, false).await;

        let list = ListMemberMembershipsHandler::new(h.factory(), h.access())
            .handle(ListMemberMembershipsQuery {
                actor: Actor::member(member, None),
                member_id: member,
            })
            .await
            .unwrap();

        assert_eq!(list.iter().map(|m| m.id).collect::<Vec<_>>(), vec![current.id, old.id]);
    }

    #[tokio::test]
    async fn unknown_member_is_not_found() {
        let h = Harness::new();
        let err = ListMemberMembershipsHandler::new(h.factory(), h.access())
            .handle(ListMemberMembershipsQuery {
                actor: Actor::platform_admin(UserId::new()),
                member_id: UserId::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::MemberNotFound);
    }
}
