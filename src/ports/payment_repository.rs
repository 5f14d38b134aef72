use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MembershipId};
use crate::domain::payment::Payment;

#[async_trait]
pub trait PaymentRepository: Send {
    async fn insert(&mut self, payment: &Payment) -> Result<(), DomainError>;

    async fn update(&mut self, payment: &Payment) -> Result<(), DomainError>;

    /// Most recently created `Pending` payment of a membership, locked.
    async fn find_latest_pending(
        &mut self,
        membership_id: MembershipId,
    ) -> Result<Option<Payment>, DomainError>;

    /// Every payment of a membership, oldest first.
    async fn list_for_membership(
        &mut self,
        membership_id: MembershipId,
    ) -> Result<Vec<Payment>, DomainError>;
}
