//! Append-only wallet ledger.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::foundation::{DomainError, Money, UserId};
use crate::domain::wallet::WalletTransaction;
use crate::ports::WalletRepository;

use super::rows::{WalletRow, WALLET_COLUMNS};
use super::unit_of_work::{db_error, PgUnitOfWork};

#[async_trait]
impl WalletRepository for PgUnitOfWork {
    async fn append(&mut self, transaction: &WalletTransaction) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO wallet_transactions (
                id, member_id, amount, transaction_type, reference_id, description,
                created_by, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(transaction.id.as_uuid())
        .bind(transaction.member_id.as_uuid())
        .bind(transaction.amount.amount())
        .bind(transaction.transaction_type.as_str())
        .bind(transaction.reference_id)
        .bind(&transaction.description)
        .bind(transaction.created_by.as_uuid())
        .bind(transaction.created_at.as_datetime())
        .execute(&mut *self.tx)
        .await
        .map_err(db_error("Failed to append wallet transaction"))?;

        Ok(())
    }

    async fn balance(&mut self, member_id: UserId) -> Result<Money, DomainError> {
        let sum: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM wallet_transactions WHERE member_id = $1",
        )
        .bind(member_id.as_uuid())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(db_error("Failed to compute wallet balance"))?;

        Ok(Money::new(sum))
    }

    async fn list_for_member(
        &mut self,
        member_id: UserId,
    ) -> Result<Vec<WalletTransaction>, DomainError> {
        let sql = format!(
            "SELECT {} FROM wallet_transactions WHERE member_id = $1 ORDER BY seq DESC",
            WALLET_COLUMNS
        );
        let rows: Vec<WalletRow> = sqlx::query_as(&sql)
            .bind(member_id.as_uuid())
            .fetch_all(&mut *self.tx)
            .await
            .map_err(db_error("Failed to list wallet transactions"))?;
        rows.into_iter().map(WalletTransaction::try_from).collect()
    }
}
