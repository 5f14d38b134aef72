//! Wallet ledger persistence.
//!
//! Append-only: there is deliberately no update or delete.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Money, UserId};
use crate::domain::wallet::WalletTransaction;

#[async_trait]
pub trait WalletRepository: Send {
    async fn append(&mut self, transaction: &WalletTransaction) -> Result<(), DomainError>;

    /// Sum of every ledger row of the member, including rows appended
    /// earlier in the same unit of work.
    async fn balance(&mut self, member_id: UserId) -> Result<Money, DomainError>;

    /// Ledger rows of the member, newest first.
    async fn list_for_member(
        &mut self,
        member_id: UserId,
    ) -> Result<Vec<WalletTransaction>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &mut dyn WalletRepository) {}
    }
}
