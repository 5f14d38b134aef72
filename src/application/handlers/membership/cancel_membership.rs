//! CancelMembershipHandler - Ends an active membership immediately.
//!
//! Cancellation does not refund anything.

use std::sync::Arc;

use crate::application::services::{load_snapshot, lock_membership, MembershipSnapshot};
use crate::domain::foundation::{Actor, BranchScoped, MembershipId, Timestamp};
use crate::domain::membership::{MembershipError, MembershipStatus};
use crate::ports::{AccessPolicy, UnitOfWorkFactory};

#[derive(Debug, Clone)]
pub struct CancelMembershipCommand {
    pub actor: Actor,
    pub membership_id: MembershipId,
    pub reason: Option<String>,
}

pub struct CancelMembershipHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    access: Arc<dyn AccessPolicy>,
}

impl CancelMembershipHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, access: Arc<dyn AccessPolicy>) -> Self {
        Self {
            uow_factory,
            access,
        }
    }

    pub async fn handle(
        &self,
        cmd: CancelMembershipCommand,
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

        // Only an active period can be cancelled; pending ones are rejected
        if membership.status != MembershipStatus::Active {
            return Err(MembershipError::invalid_state(membership.status.as_str(), "cancel"));
        }
        membership.cancel(now)?;
        uow.memberships().update(&membership).await?;

        let snapshot = load_snapshot(uow.as_mut(), membership.id).await?;
        uow.commit().await?;

        tracing::info!(
            membership_id = %membership.id,
            cancelled_by = %cmd.actor.user_id,
            reason = cmd.reason.as_deref().unwrap_or(""),
            "Membership cancelled"
        );
        Ok(snapshot)
    }
}
