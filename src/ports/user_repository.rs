//! User account and trainer assignment ports.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Money, UserId};
use crate::domain::people::{TrainerAssignment, UserAccount};

#[async_trait]
pub trait UserRepository: Send {
    async fn find_by_id(&mut self, id: UserId) -> Result<Option<UserAccount>, DomainError>;

    /// Loads the account and locks it for the rest of the unit of work.
    ///
    /// Membership creation, upgrades and renewals lock the member first so
    /// concurrent requests for the same member serialise.
    async fn find_for_update(&mut self, id: UserId) -> Result<Option<UserAccount>, DomainError>;

    /// Inserts or replaces an account.
    async fn save(&mut self, account: &UserAccount) -> Result<(), DomainError>;

    /// Writes the cached wallet balance of a member.
    ///
    /// # Errors
    ///
    /// - `MemberNotFound` if no such member exists
    async fn update_wallet_balance(&mut self, id: UserId, balance: Money)
        -> Result<(), DomainError>;
}

#[async_trait]
pub trait TrainerAssignmentRepository: Send {
    /// Most recent assignment for the member, if any.
    async fn current_for_member(
        &mut self,
        member_id: UserId,
    ) -> Result<Option<TrainerAssignment>, DomainError>;

    async fn assign(&mut self, assignment: &TrainerAssignment) -> Result<(), DomainError>;
}
