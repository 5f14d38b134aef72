use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::invoice::Invoice;

/// Produces the printable artifact for a persisted invoice.
///
/// Rendering is best-effort and never part of the financial transaction:
/// a failure leaves the invoice without a `file_path`.
#[async_trait]
pub trait InvoiceRenderer: Send + Sync {
    /// Renders the invoice and returns the path of the written file.
    async fn render(&self, invoice: &Invoice) -> Result<String, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_renderer_is_object_safe() {
        fn _accepts_dyn(_renderer: &dyn InvoiceRenderer) {}
    }
}
