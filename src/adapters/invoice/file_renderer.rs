//! Plain-text receipt renderer writing one file per invoice.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::invoice::Invoice;
use crate::ports::InvoiceRenderer;

/// Writes `<output_dir>/<number>.txt`.
#[derive(Debug, Clone)]
pub struct FileInvoiceRenderer {
    output_dir: PathBuf,
}

impl FileInvoiceRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn body(invoice: &Invoice) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", invoice.kind.title().to_uppercase()));
        out.push_str(&format!("Invoice:     {}\n", invoice.number));
        out.push_str(&format!(
            "Issued:      {}\n",
            invoice.issued_at.as_datetime().format("%Y-%m-%d %H:%M UTC")
        ));
        out.push_str(&format!("Member:      {}\n", invoice.member_id));
        if let Some(membership) = invoice.membership_id {
            out.push_str(&format!("Membership:  {}\n", membership));
        }
        if let Some(branch) = invoice.branch_id {
            out.push_str(&format!("Branch:      {}\n", branch));
        }
        out.push_str(&format!("Description: {}\n", invoice.description));
        out.push_str(&format!("Total:       {}\n", invoice.amount));
        out
    }
}

#[async_trait]
impl InvoiceRenderer for FileInvoiceRenderer {
    async fn render(&self, invoice: &Invoice) -> Result<String, DomainError> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| DomainError::internal(format!("create invoice dir: {}", e)))?;

        let path = self.output_dir.join(format!("{}.txt", invoice.number));
        tokio::fs::write(&path, Self::body(invoice))
            .await
            .map_err(|e| DomainError::internal(format!("write invoice: {}", e)))?;

        Ok(path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{MembershipId, Money, Timestamp, UserId};
    use crate::domain::invoice::InvoiceKind;

    fn invoice() -> Invoice {
        Invoice::issue(
            UserId::new(),
            Some(MembershipId::new()),
            None,
            InvoiceKind::Upgrade,
            Money::from_units(80),
            "Upgrade Silver -> Gold",
            Timestamp::now(),
        )
    }

    #[tokio::test]
    async fn writes_receipt_named_after_invoice_number() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = FileInvoiceRenderer::new(dir.path().join("receipts"));
        let invoice = invoice();

        let path = renderer.render(&invoice).await.unwrap();

        assert!(path.ends_with(&format!("{}.txt", invoice.number)));
        let body = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(body.starts_with("MEMBERSHIP UPGRADE"));
        assert!(body.contains("Total:       80.00"));
        assert!(body.contains("Upgrade Silver -> Gold"));
    }

    #[tokio::test]
    async fn unwritable_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("occupied");
        tokio::fs::write(&blocker, "not a directory").await.unwrap();

        let renderer = FileInvoiceRenderer::new(&blocker);
        assert!(renderer.render(&invoice()).await.is_err());
    }
}
