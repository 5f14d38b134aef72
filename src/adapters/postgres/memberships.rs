//! Memberships.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, MembershipId, Timestamp, UserId};
use crate::domain::membership::Membership;
use crate::ports::MembershipRepository;

use super::rows::{MembershipRow, MEMBERSHIP_COLUMNS};
use super::unit_of_work::{db_error, violated_constraint, PgUnitOfWork, SINGLE_OPEN_INDEX};

const OPEN_STATUSES: &str = "('pending_payment', 'active', 'frozen')";

fn map_write_error(
    membership: &Membership,
    context: &'static str,
) -> impl FnOnce(sqlx::Error) -> DomainError {
    let member_id = membership.member_id;
    move |e| {
        if violated_constraint(&e) == Some(SINGLE_OPEN_INDEX) {
            return DomainError::new(
                ErrorCode::MembershipAlreadyOpen,
                "Member already has an open membership",
            )
            .with_detail("member_id", member_id.to_string());
        }
        db_error(context)(e)
    }
}

impl PgUnitOfWork {
    async fn fetch_memberships(
        &mut self,
        filter: &str,
        bind: uuid::Uuid,
    ) -> Result<Vec<Membership>, DomainError> {
        let sql = format!("SELECT {} FROM memberships WHERE {}", MEMBERSHIP_COLUMNS, filter);
        let rows: Vec<MembershipRow> = sqlx::query_as(&sql)
            .bind(bind)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(db_error("Failed to fetch memberships"))?;
        rows.into_iter().map(Membership::try_from).collect()
    }
}

#[async_trait]
impl MembershipRepository for PgUnitOfWork {
    async fn find_by_id(&mut self, id: MembershipId) -> Result<Option<Membership>, DomainError> {
        Ok(self
            .fetch_memberships("id = $1", *id.as_uuid())
            .await?
            .into_iter()
            .next())
    }

    async fn find_for_update(
        &mut self,
        id: MembershipId,
    ) -> Result<Option<Membership>, DomainError> {
        Ok(self
            .fetch_memberships("id = $1 FOR UPDATE", *id.as_uuid())
            .await?
            .into_iter()
            .next())
    }

    async fn find_open_for_member(
        &mut self,
        member_id: UserId,
    ) -> Result<Vec<Membership>, DomainError> {
        let filter = format!("member_id = $1 AND status IN {}", OPEN_STATUSES);
        self.fetch_memberships(&filter, *member_id.as_uuid()).await
    }

    async fn list_for_member(&mut self, member_id: UserId) -> Result<Vec<Membership>, DomainError> {
        self.fetch_memberships("member_id = $1 ORDER BY created_at DESC", *member_id.as_uuid())
            .await
    }

    async fn find_lapsed(&mut self, now: Timestamp) -> Result<Vec<Membership>, DomainError> {
        let sql = format!(
            "SELECT {} FROM memberships WHERE status = 'active' AND end_date < $1 ORDER BY end_date",
            MEMBERSHIP_COLUMNS
        );
        let rows: Vec<MembershipRow> = sqlx::query_as(&sql)
            .bind(now.as_datetime())
            .fetch_all(&mut *self.tx)
            .await
            .map_err(db_error("Failed to fetch lapsed memberships"))?;
        rows.into_iter().map(Membership::try_from).collect()
    }

    async fn find_active_ending_between(
        &mut self,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Membership>, DomainError> {
        let sql = format!(
            "SELECT {} FROM memberships \
             WHERE status = 'active' AND end_date >= $1 AND end_date <= $2 ORDER BY end_date",
            MEMBERSHIP_COLUMNS
        );
        let rows: Vec<MembershipRow> = sqlx::query_as(&sql)
            .bind(from.as_datetime())
            .bind(to.as_datetime())
            .fetch_all(&mut *self.tx)
            .await
            .map_err(db_error("Failed to fetch expiring memberships"))?;
        rows.into_iter().map(Membership::try_from).collect()
    }

    async fn insert(&mut self, membership: &Membership) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO memberships (
                id, member_id, plan_id, branch_id, start_date, end_date, status, source,
                auto_renew, total_paid, wallet_contribution, freeze_start, freeze_end,
                created_at, updated_at, cancelled_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(membership.id.as_uuid())
        .bind(membership.member_id.as_uuid())
        .bind(membership.plan_id.as_uuid())
        .bind(membership.branch_id.map(|b| *b.as_uuid()))
        .bind(membership.start_date.as_datetime())
        .bind(membership.end_date.as_datetime())
        .bind(membership.status.as_str())
        .bind(membership.source.as_str())
        .bind(membership.auto_renew)
        .bind(membership.total_paid.amount())
        .bind(membership.wallet_contribution.amount())
        .bind(membership.freeze_start.map(|t| *t.as_datetime()))
        .bind(membership.freeze_end.map(|t| *t.as_datetime()))
        .bind(membership.created_at.as_datetime())
        .bind(membership.updated_at.as_datetime())
        .bind(membership.cancelled_at.map(|t| *t.as_datetime()))
        .execute(&mut *self.tx)
        .await
        .map_err(map_write_error(membership, "Failed to insert membership"))?;

        Ok(())
    }

    async fn update(&mut self, membership: &Membership) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE memberships SET
                plan_id = $2,
                start_date = $3,
                end_date = $4,
                status = $5,
                auto_renew = $6,
                total_paid = $7,
                wallet_contribution = $8,
                freeze_start = $9,
                freeze_end = $10,
                updated_at = $11,
                cancelled_at = $12
            WHERE id = $1
            "#,
        )
        .bind(membership.id.as_uuid())
        .bind(membership.plan_id.as_uuid())
        .bind(membership.start_date.as_datetime())
        .bind(membership.end_date.as_datetime())
        .bind(membership.status.as_str())
        .bind(membership.auto_renew)
        .bind(membership.total_paid.amount())
        .bind(membership.wallet_contribution.amount())
        .bind(membership.freeze_start.map(|t| *t.as_datetime()))
        .bind(membership.freeze_end.map(|t| *t.as_datetime()))
        .bind(membership.updated_at.as_datetime())
        .bind(membership.cancelled_at.map(|t| *t.as_datetime()))
        .execute(&mut *self.tx)
        .await
        .map_err(map_write_error(membership, "Failed to update membership"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::MembershipNotFound, "Membership not found")
                .with_detail("id", membership.id.to_string()));
        }
        Ok(())
    }
}
