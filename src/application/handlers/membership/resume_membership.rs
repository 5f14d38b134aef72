//! ResumeMembershipHandler - Ends a freeze and extends the period.

use std::sync::Arc;

use crate::application::services::{load_snapshot, lock_membership, MembershipSnapshot};
use crate::domain::foundation::{Actor, BranchScoped, MembershipId, Timestamp};
use crate::domain::membership::MembershipError;
use crate::ports::{AccessPolicy, UnitOfWorkFactory};

#[derive(Debug, Clone)]
pub struct ResumeMembershipCommand {
    pub actor: Actor,
    pub membership_id: MembershipId,
}

pub struct ResumeMembershipHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    access: Arc<dyn AccessPolicy>,
}

impl ResumeMembershipHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, access: Arc<dyn AccessPolicy>) -> Self {
        Self {
            uow_factory,
            access,
        }
    }

    pub async fn handle(
        &self,
        cmd: ResumeMembershipCommand,
    ) -> Result<MembershipSnapshot, MembershipError> {
        let now = Timestamp::now();
        let mut uow = self.uow_factory.begin().await?;

        let mut membership = lock_membership(uow.as_mut(), cmd.membership_id)
            .await?
            .ok_or_else(|| MembershipError::not_found(cmd.membership_id))?;
        self.access
            .ensure_member_owns_resource(&cmd.actor, membership.member_id)
            .await?;
        membership.check_branch(&cmd.actor)?;

        // Another open membership would break the single-open rule
        let others = uow
            .memberships()
            .find_open_for_member(membership.member_id)
            .await?;
        if others.iter().any(|m| m.id != membership.id) {
            return Err(MembershipError::already_open(membership.member_id));
        }

        let extended_by = membership.resume(now)?;
        uow.memberships().update(&membership).await?;

        let snapshot = load_snapshot(uow.as_mut(), membership.id).await?;
        uow.commit().await?;

        tracing::info!(
            membership_id = %membership.id,
            extended_secs = extended_by.num_seconds(),
            "Membership resumed"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Harness;
    use crate::domain::foundation::{ErrorCode, UserId};
    use crate::domain::membership::MembershipStatus;

    #[tokio::test]
    async fn resume_extends_end_by_frozen_time() {
        let h = Harness::new();
        let member = h.member(None).await;
        let plan = h.plan("Gold", 100).await;
        let mut m = h.active_membership(member, &plan, false).await;
        let original_end = m.end_date;
        m.freeze(Timestamp::now().minus_days(5), Timestamp::now()).unwrap();
        h.save_membership(&m).await;

        let snap = ResumeMembershipHandler::new(h.factory(), h.access())
            .handle(ResumeMembershipCommand {
                actor: Actor::member(member, None),
                membership_id: m.id,
            })
            .await
            .unwrap();

        assert_eq!(snap.membership.status, MembershipStatus::Active);
        assert!(snap.membership.end_date >= original_end.add_days(5));
        assert!(snap.membership.end_date < original_end.add_days(6));
        assert!(snap.membership.freeze_start.is_none());
        assert!(snap.membership.freeze_end.is_some());
    }

    #[tokio::test]
    async fn future_freeze_adds_nothing() {
        let h = Harness::new();
        let member = h.member(None).await;
        let plan = h.plan("Gold", 100).await;
        let mut m = h.active_membership(member, &plan, false).await;
        let original_end = m.end_date;
        m.freeze(Timestamp::now().add_days(3), Timestamp::now()).unwrap();
        h.save_membership(&m).await;

        let snap = ResumeMembershipHandler::new(h.factory(), h.access())
            .handle(ResumeMembershipCommand {
                actor: Actor::platform_admin(UserId::new()),
                membership_id: m.id,
            })
            .await
            .unwrap();

        assert_eq!(snap.membership.end_date, original_end);
    }

    #[tokio::test]
    async fn active_membership_cannot_resume() {
        let h = Harness::new();
        let member = h.member(None).await;
        let plan = h.plan("Gold", 100).await;
        let m = h.active_membership(member, &plan, false).await;

        let err = ResumeMembershipHandler::new(h.factory(), h.access())
            .handle(ResumeMembershipCommand {
                actor: Actor::member(member, None),
                membership_id: m.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
    }
}
