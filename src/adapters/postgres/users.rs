//! User accounts and trainer assignments.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, Money, UserId};
use crate::domain::people::{RoleProfile, TrainerAssignment, UserAccount};
use crate::ports::{TrainerAssignmentRepository, UserRepository};

use super::rows::{role_name, AssignmentRow, UserRow, USER_COLUMNS};
use super::unit_of_work::{db_error, PgUnitOfWork};

impl PgUnitOfWork {
    /// `FOR NO KEY UPDATE` serialises writers on the member row without
    /// conflicting with the `KEY SHARE` locks that ledger and membership
    /// inserts take through their foreign keys.
    async fn fetch_user(&mut self, id: UserId, lock: bool) -> Result<Option<UserAccount>, DomainError> {
        let sql = format!(
            "SELECT {} FROM users WHERE id = $1{}",
            USER_COLUMNS,
            if lock { " FOR NO KEY UPDATE" } else { "" }
        );
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_error("Failed to fetch user"))?;
        row.map(UserAccount::try_from).transpose()
    }
}

#[async_trait]
impl UserRepository for PgUnitOfWork {
    async fn find_by_id(&mut self, id: UserId) -> Result<Option<UserAccount>, DomainError> {
        self.fetch_user(id, false).await
    }

    async fn find_for_update(&mut self, id: UserId) -> Result<Option<UserAccount>, DomainError> {
        self.fetch_user(id, true).await
    }

    async fn save(&mut self, account: &UserAccount) -> Result<(), DomainError> {
        let (wallet_balance, specialization) = match &account.profile {
            RoleProfile::Member(profile) => (Some(profile.wallet_balance.amount()), None),
            RoleProfile::Trainer(profile) => (None, profile.specialization.clone()),
            RoleProfile::Admin => (None, None),
        };

        sqlx::query(
            r#"
            INSERT INTO users (
                id, full_name, email, branch_id, is_active, role, wallet_balance, specialization
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                full_name = EXCLUDED.full_name,
                email = EXCLUDED.email,
                branch_id = EXCLUDED.branch_id,
                is_active = EXCLUDED.is_active,
                role = EXCLUDED.role,
                wallet_balance = EXCLUDED.wallet_balance,
                specialization = EXCLUDED.specialization
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(&account.full_name)
        .bind(&account.email)
        .bind(account.branch_id.map(|b| *b.as_uuid()))
        .bind(account.is_active)
        .bind(role_name(&account.profile))
        .bind(wallet_balance)
        .bind(specialization)
        .execute(&mut *self.tx)
        .await
        .map_err(db_error("Failed to save user"))?;

        Ok(())
    }

    async fn update_wallet_balance(&mut self, id: UserId, balance: Money) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE users SET wallet_balance = $2 WHERE id = $1 AND role = 'member'",
        )
        .bind(id.as_uuid())
        .bind(balance.amount())
        .execute(&mut *self.tx)
        .await
        .map_err(db_error("Failed to update wallet balance"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::MemberNotFound, "Member not found")
                .with_detail("id", id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TrainerAssignmentRepository for PgUnitOfWork {
    async fn current_for_member(
        &mut self,
        member_id: UserId,
    ) -> Result<Option<TrainerAssignment>, DomainError> {
        let row: Option<AssignmentRow> = sqlx::query_as(
            r#"
            SELECT member_id, trainer_id, assigned_at
            FROM trainer_assignments
            WHERE member_id = $1
            ORDER BY assigned_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(member_id.as_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(db_error("Failed to fetch trainer assignment"))?;

        Ok(row.map(TrainerAssignment::from))
    }

    async fn assign(&mut self, assignment: &TrainerAssignment) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO trainer_assignments (member_id, trainer_id, assigned_at) VALUES ($1, $2, $3)",
        )
        .bind(assignment.member_id.as_uuid())
        .bind(assignment.trainer_id.as_uuid())
        .bind(assignment.assigned_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(db_error("Failed to assign trainer"))?;

        Ok(())
    }
}
