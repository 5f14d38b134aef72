//! Membership repository port.
//!
//! # Design
//!
//! - **Transactional**: every method runs inside the owning unit of work
//! - **Single open membership**: implementations must back the
//!   one-open-membership-per-member rule with a store constraint, so two
//!   concurrent creations cannot both commit; a violation surfaces as
//!   `MembershipAlreadyOpen`

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MembershipId, Timestamp, UserId};
use crate::domain::membership::Membership;

#[async_trait]
pub trait MembershipRepository: Send {
    /// Find a membership by its ID.
    async fn find_by_id(&mut self, id: MembershipId) -> Result<Option<Membership>, DomainError>;

    /// Find a membership and lock its row for the rest of the unit of work.
    async fn find_for_update(
        &mut self,
        id: MembershipId,
    ) -> Result<Option<Membership>, DomainError>;

    /// Commercially open memberships (pending, active, frozen) of a member.
    async fn find_open_for_member(
        &mut self,
        member_id: UserId,
    ) -> Result<Vec<Membership>, DomainError>;

    /// All memberships of a member, newest first.
    async fn list_for_member(&mut self, member_id: UserId)
        -> Result<Vec<Membership>, DomainError>;

    /// Active memberships whose end date is strictly before `now`.
    async fn find_lapsed(&mut self, now: Timestamp) -> Result<Vec<Membership>, DomainError>;

    /// Active memberships with `from <= end_date <= to`.
    async fn find_active_ending_between(
        &mut self,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Membership>, DomainError>;

    /// Save a new membership.
    ///
    /// # Errors
    ///
    /// - `MembershipAlreadyOpen` if the member already has an open membership
    /// - `DatabaseError` on persistence failure
    async fn insert(&mut self, membership: &Membership) -> Result<(), DomainError>;

    /// Update an existing membership.
    ///
    /// # Errors
    ///
    /// - `MembershipNotFound` if membership doesn't exist
    /// - `MembershipAlreadyOpen` if the update would reopen a second membership
    async fn update(&mut self, membership: &Membership) -> Result<(), DomainError>;
}
