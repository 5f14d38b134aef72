//! FreezeMembershipHandler - Pauses an active membership.

use std::sync::Arc;

use crate::application::services::{load_snapshot, lock_membership, MembershipSnapshot};
use crate::domain::foundation::{Actor, BranchScoped, MembershipId, Timestamp};
use crate::domain::membership::MembershipError;
use crate::ports::{AccessPolicy, UnitOfWorkFactory};

#[derive(Debug, Clone)]
pub struct FreezeMembershipCommand {
    pub actor: Actor,
    pub membership_id: MembershipId,
    /// Defaults to now.
    pub start: Option<Timestamp>,
}

pub struct FreezeMembershipHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    access: Arc<dyn AccessPolicy>,
}

impl FreezeMembershipHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, access: Arc<dyn AccessPolicy>) -> Self {
        Self {
            uow_factory,
            access,
        }
    }

    pub async fn handle(
        &self,
        cmd: FreezeMembershipCommand,
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

        membership.freeze(cmd.start.unwrap_or(now), now)?;
        uow.memberships().update(&membership).await?;

        let snapshot = load_snapshot(uow.as_mut(), membership.id).await?;
        uow.commit().await?;

        tracing::info!(membership_id = %membership.id, "Membership frozen");
        Ok(snapshot)
    }
}
