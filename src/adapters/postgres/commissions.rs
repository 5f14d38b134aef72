//! Trainer commissions.
//!
//! `(membership_id, source)` is unique in the schema; inserts that lose a
//! race against that constraint are ignored rather than failing.

use async_trait::async_trait;

use crate::domain::commission::{Commission, CommissionSource};
use crate::domain::foundation::{CommissionId, DomainError, ErrorCode, MembershipId, UserId};
use crate::ports::CommissionRepository;

use super::rows::{CommissionRow, COMMISSION_COLUMNS};
use super::unit_of_work::{db_error, PgUnitOfWork};

impl PgUnitOfWork {
    async fn fetch_commissions(
        &mut self,
        filter: &str,
        bind: uuid::Uuid,
    ) -> Result<Vec<Commission>, DomainError> {
        let sql = format!("SELECT {} FROM commissions WHERE {}", COMMISSION_COLUMNS, filter);
        let rows: Vec<CommissionRow> = sqlx::query_as(&sql)
            .bind(bind)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(db_error("Failed to fetch commissions"))?;
        rows.into_iter().map(Commission::try_from).collect()
    }
}

#[async_trait]
impl CommissionRepository for PgUnitOfWork {
    async fn exists(
        &mut self,
        membership_id: MembershipId,
        source: CommissionSource,
    ) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM commissions WHERE membership_id = $1 AND source = $2)",
        )
        .bind(membership_id.as_uuid())
        .bind(source.as_str())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_error("Failed to check commission"))
    }

    async fn insert_if_absent(&mut self, commission: &Commission) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO commissions (
                id, trainer_id, membership_id, branch_id, source, percentage, amount,
                is_paid, paid_at, paid_by, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (membership_id, source) DO NOTHING
            "#,
        )
        .bind(commission.id.as_uuid())
        .bind(commission.trainer_id.as_uuid())
        .bind(commission.membership_id.as_uuid())
        .bind(commission.branch_id.map(|b| *b.as_uuid()))
        .bind(commission.source.as_str())
        .bind(commission.percentage.value())
        .bind(commission.amount.amount())
        .bind(commission.is_paid)
        .bind(commission.paid_at.map(|t| *t.as_datetime()))
        .bind(commission.paid_by.map(|u| *u.as_uuid()))
        .bind(commission.created_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(db_error("Failed to insert commission"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_for_update(
        &mut self,
        id: CommissionId,
    ) -> Result<Option<Commission>, DomainError> {
        Ok(self
            .fetch_commissions("id = $1 FOR UPDATE", *id.as_uuid())
            .await?
            .into_iter()
            .next())
    }

    async fn update(&mut self, commission: &Commission) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE commissions SET is_paid = $2, paid_at = $3, paid_by = $4 WHERE id = $1",
        )
        .bind(commission.id.as_uuid())
        .bind(commission.is_paid)
        .bind(commission.paid_at.map(|t| *t.as_datetime()))
        .bind(commission.paid_by.map(|u| *u.as_uuid()))
        .execute(&mut *self.tx)
        .await
        .map_err(db_error("Failed to update commission"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::CommissionNotFound, "Commission not found")
                .with_detail("id", commission.id.to_string()));
        }
        Ok(())
    }

    async fn list_for_trainer(&mut self, trainer_id: UserId) -> Result<Vec<Commission>, DomainError> {
        self.fetch_commissions("trainer_id = $1 ORDER BY created_at DESC", *trainer_id.as_uuid())
            .await
    }

    async fn list_for_membership(
        &mut self,
        membership_id: MembershipId,
    ) -> Result<Vec<Commission>, DomainError> {
        self.fetch_commissions("membership_id = $1 ORDER BY created_at", *membership_id.as_uuid())
            .await
    }
}
