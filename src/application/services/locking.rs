//! Row-lock ordering.
//!
//! Every unit of work that touches a member's money or memberships locks the
//! member row before any membership row. Wallet appends lock the member as
//! well, so a handler that locked a membership first could deadlock against
//! upgrades, renewals and bookings for the same member.

use crate::domain::foundation::{DomainError, MembershipId};
use crate::domain::membership::Membership;
use crate::ports::UnitOfWork;

/// Locks the owning member, then the membership, and returns the membership
/// as read under both locks.
pub async fn lock_membership(
    uow: &mut dyn UnitOfWork,
    id: MembershipId,
) -> Result<Option<Membership>, DomainError> {
    let Some(peek) = uow.memberships().find_by_id(id).await? else {
        return Ok(None);
    };
    uow.members().find_for_update(peek.member_id).await?;
    uow.memberships().find_for_update(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Harness;
    use crate::domain::membership::MembershipStatus;
    use crate::ports::UnitOfWorkFactory;

    #[tokio::test]
    async fn returns_the_membership_read_under_lock() {
        let h = Harness::new();
        let member = h.member(None).await;
        let plan = h.plan("Gold", 100).await;
        let m = h.active_membership(member, &plan, false).await;

        let mut uow = h.store.begin().await.unwrap();
        let locked = lock_membership(uow.as_mut(), m.id).await.unwrap().unwrap();

        assert_eq!(locked.id, m.id);
        assert_eq!(locked.status, MembershipStatus::Active);
    }

    #[tokio::test]
    async fn unknown_membership_is_none() {
        let h = Harness::new();
        let mut uow = h.store.begin().await.unwrap();
        assert!(lock_membership(uow.as_mut(), MembershipId::new())
            .await
            .unwrap()
            .is_none());
    }
}
