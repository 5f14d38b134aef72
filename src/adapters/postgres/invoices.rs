//! Invoice receipts.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, InvoiceId, UserId};
use crate::domain::invoice::Invoice;
use crate::ports::InvoiceRepository;

use super::rows::{InvoiceRow, INVOICE_COLUMNS};
use super::unit_of_work::{db_error, PgUnitOfWork};

#[async_trait]
impl InvoiceRepository for PgUnitOfWork {
    async fn insert(&mut self, invoice: &Invoice) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, number, member_id, membership_id, branch_id, kind, amount, description,
                issued_at, file_path
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(invoice.id.as_uuid())
        .bind(&invoice.number)
        .bind(invoice.member_id.as_uuid())
        .bind(invoice.membership_id.map(|m| *m.as_uuid()))
        .bind(invoice.branch_id.map(|b| *b.as_uuid()))
        .bind(invoice.kind.as_str())
        .bind(invoice.amount.amount())
        .bind(&invoice.description)
        .bind(invoice.issued_at.as_datetime())
        .bind(&invoice.file_path)
        .execute(&mut *self.tx)
        .await
        .map_err(db_error("Failed to insert invoice"))?;

        Ok(())
    }

    async fn attach_file(&mut self, id: InvoiceId, path: &str) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE invoices SET file_path = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(path)
            .execute(&mut *self.tx)
            .await
            .map_err(db_error("Failed to attach invoice file"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::InvoiceNotFound, "Invoice not found")
                .with_detail("id", id.to_string()));
        }
        Ok(())
    }

    async fn list_for_member(&mut self, member_id: UserId) -> Result<Vec<Invoice>, DomainError> {
        let sql = format!(
            "SELECT {} FROM invoices WHERE member_id = $1 ORDER BY issued_at DESC",
            INVOICE_COLUMNS
        );
        let rows: Vec<InvoiceRow> = sqlx::query_as(&sql)
            .bind(member_id.as_uuid())
            .fetch_all(&mut *self.tx)
            .await
            .map_err(db_error("Failed to list invoices"))?;
        rows.into_iter().map(Invoice::try_from).collect()
    }
}
