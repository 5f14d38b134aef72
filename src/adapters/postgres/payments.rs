//! Membership payments.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, MembershipId};
use crate::domain::payment::Payment;
use crate::ports::PaymentRepository;

use super::rows::{PaymentRow, PAYMENT_COLUMNS};
use super::unit_of_work::{db_error, PgUnitOfWork};

#[async_trait]
impl PaymentRepository for PgUnitOfWork {
    async fn insert(&mut self, payment: &Payment) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, membership_id, member_id, amount, method, status, proof_url, paid_at,
                reviewed_at, reviewed_by, rejection_reason, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.membership_id.as_uuid())
        .bind(payment.member_id.as_uuid())
        .bind(payment.amount.amount())
        .bind(payment.method.as_str())
        .bind(payment.status.as_str())
        .bind(&payment.proof_url)
        .bind(payment.paid_at.map(|t| *t.as_datetime()))
        .bind(payment.reviewed_at.map(|t| *t.as_datetime()))
        .bind(payment.reviewed_by.map(|u| *u.as_uuid()))
        .bind(&payment.rejection_reason)
        .bind(payment.created_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(db_error("Failed to insert payment"))?;

        Ok(())
    }

    async fn update(&mut self, payment: &Payment) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE payments SET
                status = $2,
                proof_url = $3,
                paid_at = $4,
                reviewed_at = $5,
                reviewed_by = $6,
                rejection_reason = $7
            WHERE id = $1
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.status.as_str())
        .bind(&payment.proof_url)
        .bind(payment.paid_at.map(|t| *t.as_datetime()))
        .bind(payment.reviewed_at.map(|t| *t.as_datetime()))
        .bind(payment.reviewed_by.map(|u| *u.as_uuid()))
        .bind(&payment.rejection_reason)
        .execute(&mut *self.tx)
        .await
        .map_err(db_error("Failed to update payment"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::PaymentNotFound, "Payment not found")
                .with_detail("id", payment.id.to_string()));
        }
        Ok(())
    }

    async fn find_latest_pending(
        &mut self,
        membership_id: MembershipId,
    ) -> Result<Option<Payment>, DomainError> {
        let sql = format!(
            "SELECT {} FROM payments WHERE membership_id = $1 AND status = 'pending' \
             ORDER BY created_at DESC LIMIT 1 FOR UPDATE",
            PAYMENT_COLUMNS
        );
        let row: Option<PaymentRow> = sqlx::query_as(&sql)
            .bind(membership_id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_error("Failed to fetch pending payment"))?;
        row.map(Payment::try_from).transpose()
    }

    async fn list_for_membership(
        &mut self,
        membership_id: MembershipId,
    ) -> Result<Vec<Payment>, DomainError> {
        let sql = format!(
            "SELECT {} FROM payments WHERE membership_id = $1 ORDER BY created_at, id",
            PAYMENT_COLUMNS
        );
        let rows: Vec<PaymentRow> = sqlx::query_as(&sql)
            .bind(membership_id.as_uuid())
            .fetch_all(&mut *self.tx)
            .await
            .map_err(db_error("Failed to list payments"))?;
        rows.into_iter().map(Payment::try_from).collect()
    }
}
