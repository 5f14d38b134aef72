//! Membership plan catalogue.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, PlanId};
use crate::domain::membership::{MembershipError, MembershipPlan};
use crate::ports::PlanRepository;

use super::rows::{PlanRow, PLAN_COLUMNS};
use super::unit_of_work::{db_error, violated_constraint, PgUnitOfWork, PLAN_NAME_INDEX};

fn to_i32(field: &str, value: u32) -> Result<i32, DomainError> {
    i32::try_from(value).map_err(|_| {
        DomainError::new(ErrorCode::OutOfRange, format!("{} is too large", field))
            .with_detail("field", field)
    })
}

fn map_write_error<'a>(
    plan: &'a MembershipPlan,
    context: &'static str,
) -> impl FnOnce(sqlx::Error) -> DomainError + 'a {
    move |e| {
        if violated_constraint(&e) == Some(PLAN_NAME_INDEX) {
            return MembershipError::duplicate_plan_name(&plan.name).into();
        }
        db_error(context)(e)
    }
}

#[async_trait]
impl PlanRepository for PgUnitOfWork {
    async fn find_by_id(&mut self, id: PlanId) -> Result<Option<MembershipPlan>, DomainError> {
        let sql = format!("SELECT {} FROM membership_plans WHERE id = $1", PLAN_COLUMNS);
        let row: Option<PlanRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_error("Failed to fetch plan"))?;
        row.map(MembershipPlan::try_from).transpose()
    }

    async fn find_by_name(&mut self, name: &str) -> Result<Option<MembershipPlan>, DomainError> {
        let sql = format!(
            "SELECT {} FROM membership_plans WHERE lower(name) = $1 AND NOT is_deleted",
            PLAN_COLUMNS
        );
        let row: Option<PlanRow> = sqlx::query_as(&sql)
            .bind(MembershipPlan::name_key(name))
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_error("Failed to fetch plan by name"))?;
        row.map(MembershipPlan::try_from).transpose()
    }

    async fn list(&mut self) -> Result<Vec<MembershipPlan>, DomainError> {
        let sql = format!(
            "SELECT {} FROM membership_plans WHERE NOT is_deleted ORDER BY name",
            PLAN_COLUMNS
        );
        let rows: Vec<PlanRow> = sqlx::query_as(&sql)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(db_error("Failed to list plans"))?;
        rows.into_iter().map(MembershipPlan::try_from).collect()
    }

    async fn insert(&mut self, plan: &MembershipPlan) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO membership_plans (
                id, name, branch_id, duration_days, price, session_discount, sessions_per_month,
                priority_booking, add_on_access, commission_rate, is_active, is_deleted,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(plan.id.as_uuid())
        .bind(&plan.name)
        .bind(plan.branch_id.map(|b| *b.as_uuid()))
        .bind(to_i32("duration_days", plan.duration_days)?)
        .bind(plan.price.amount())
        .bind(plan.session_discount.value())
        .bind(to_i32("sessions_per_month", plan.sessions_per_month)?)
        .bind(plan.priority_booking)
        .bind(plan.add_on_access)
        .bind(plan.commission_rate.value())
        .bind(plan.is_active)
        .bind(plan.is_deleted)
        .bind(plan.created_at.as_datetime())
        .bind(plan.updated_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(map_write_error(plan, "Failed to insert plan"))?;

        Ok(())
    }

    async fn update(&mut self, plan: &MembershipPlan) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE membership_plans SET
                name = $2,
                branch_id = $3,
                duration_days = $4,
                price = $5,
                session_discount = $6,
                sessions_per_month = $7,
                priority_booking = $8,
                add_on_access = $9,
                commission_rate = $10,
                is_active = $11,
                is_deleted = $12,
                updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(plan.id.as_uuid())
        .bind(&plan.name)
        .bind(plan.branch_id.map(|b| *b.as_uuid()))
        .bind(to_i32("duration_days", plan.duration_days)?)
        .bind(plan.price.amount())
        .bind(plan.session_discount.value())
        .bind(to_i32("sessions_per_month", plan.sessions_per_month)?)
        .bind(plan.priority_booking)
        .bind(plan.add_on_access)
        .bind(plan.commission_rate.value())
        .bind(plan.is_active)
        .bind(plan.is_deleted)
        .bind(plan.updated_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(map_write_error(plan, "Failed to update plan"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::PlanNotFound, "Plan not found")
                .with_detail("id", plan.id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Money, Percentage, Timestamp};
    use crate::domain::membership::PlanDetails;

    fn gold() -> MembershipPlan {
        MembershipPlan::create(
            PlanId::new(),
            PlanDetails {
                name: "Gold".to_string(),
                branch_id: None,
                duration_days: 30,
                price: Money::from_units(100),
                session_discount: Percentage::ZERO,
                sessions_per_month: 8,
                priority_booking: false,
                add_on_access: false,
                commission_rate: Percentage::ZERO,
                is_active: true,
            },
            Timestamp::now(),
        )
        .unwrap()
    }

    #[test]
    fn write_error_without_constraint_is_a_database_error() {
        let plan = gold();
        let err = map_write_error(&plan, "Failed to insert plan")(sqlx::Error::RowNotFound);

        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.starts_with("Failed to insert plan"));
    }
}
