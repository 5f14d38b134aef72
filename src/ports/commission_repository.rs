use async_trait::async_trait;

use crate::domain::commission::{Commission, CommissionSource};
use crate::domain::foundation::{CommissionId, DomainError, MembershipId, UserId};

/// Commission persistence.
///
/// Uniqueness of (membership, source) must be a store constraint, not
/// only a pre-check.
#[async_trait]
pub trait CommissionRepository: Send {
    async fn exists(
        &mut self,
        membership_id: MembershipId,
        source: CommissionSource,
    ) -> Result<bool, DomainError>;

    /// Inserts the commission unless one already exists for its
    /// (membership, source). Returns whether a row was written.
    async fn insert_if_absent(&mut self, commission: &Commission) -> Result<bool, DomainError>;

    /// Finds a commission and locks it.
    async fn find_for_update(
        &mut self,
        id: CommissionId,
    ) -> Result<Option<Commission>, DomainError>;

    async fn update(&mut self, commission: &Commission) -> Result<(), DomainError>;

    /// Commissions earned by a trainer, newest first.
    async fn list_for_trainer(&mut self, trainer_id: UserId)
        -> Result<Vec<Commission>, DomainError>;

    async fn list_for_membership(
        &mut self,
        membership_id: MembershipId,
    ) -> Result<Vec<Commission>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commission_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &mut dyn CommissionRepository) {}
    }
}
