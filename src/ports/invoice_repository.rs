use async_trait::async_trait;

use crate::domain::foundation::{DomainError, InvoiceId, UserId};
use crate::domain::invoice::Invoice;

#[async_trait]
pub trait InvoiceRepository: Send {
    async fn insert(&mut self, invoice: &Invoice) -> Result<(), DomainError>;

    /// Records where the rendered file was written.
    ///
    /// # Errors
    ///
    /// - `InvoiceNotFound` if no such invoice exists
    async fn attach_file(&mut self, id: InvoiceId, path: &str) -> Result<(), DomainError>;

    /// Invoices of a member, newest first.
    async fn list_for_member(&mut self, member_id: UserId) -> Result<Vec<Invoice>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &mut dyn InvoiceRepository) {}
    }
}
