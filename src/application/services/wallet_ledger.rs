//! Ledger operations shared by every handler that moves wallet money.
//!
//! All functions run inside the caller's unit of work. After each append the
//! member row is locked and the ledger sum recomputed into the cached
//! `wallet_balance`, so the cache always commits together with the rows that
//! changed it. The sum is read after the lock is granted, which makes it
//! include every rival append that committed while this one waited.

use crate::domain::foundation::{DomainError, Money, UserId};
use crate::domain::membership::MembershipError;
use crate::domain::wallet::{WalletTransaction, WalletTransactionType};
use crate::ports::UnitOfWork;

/// Outcome of an optimistic debit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebitOutcome {
    /// The debit stands; carries the resulting balance.
    Applied(Money),
    /// The debit overdrew the wallet and was reversed by a compensating credit.
    Compensated,
}

/// Locks the member, recomputes the ledger sum and writes it to the cache.
pub async fn resync_balance(
    uow: &mut dyn UnitOfWork,
    member_id: UserId,
) -> Result<Money, DomainError> {
    uow.members().find_for_update(member_id).await?;
    let balance = uow.wallet().balance(member_id).await?;
    uow.members()
        .update_wallet_balance(member_id, balance)
        .await?;
    Ok(balance)
}

/// Appends a row unconditionally and returns the new balance.
pub async fn append(
    uow: &mut dyn UnitOfWork,
    transaction: &WalletTransaction,
) -> Result<Money, DomainError> {
    uow.wallet().append(transaction).await?;
    resync_balance(uow, transaction.member_id).await
}

/// Appends a debit only if the recomputed balance covers it.
///
/// # Errors
///
/// `InsufficientFunds` before anything is written.
pub async fn checked_debit(
    uow: &mut dyn UnitOfWork,
    debit: &WalletTransaction,
) -> Result<Money, MembershipError> {
    let required = debit.amount.abs();
    uow.members().find_for_update(debit.member_id).await?;
    let available = uow.wallet().balance(debit.member_id).await?;
    if available < required {
        return Err(MembershipError::insufficient_funds(required, available));
    }
    Ok(append(uow, debit).await?)
}

/// Inserts the debit first and reconciles afterwards.
///
/// The member lock is taken only after the insert, so racing bookings queue
/// on it and each reconciles against the debits committed before it. A
/// negative sum means another debit won the race. The row is then offset
/// with a `Credit` of the same amount; the caller must still commit so the
/// ledger keeps both rows, and report `ConcurrentDebit`.
pub async fn optimistic_debit(
    uow: &mut dyn UnitOfWork,
    debit: &WalletTransaction,
) -> Result<DebitOutcome, MembershipError> {
    let balance = append(uow, debit).await?;
    if !balance.is_negative() {
        return Ok(DebitOutcome::Applied(balance));
    }

    tracing::warn!(
        member_id = %debit.member_id,
        amount = %debit.amount,
        balance = %balance,
        "Wallet overdrawn by concurrent debit, compensating"
    );
    let compensation = WalletTransaction::credit(
        debit.member_id,
        debit.amount.abs(),
        WalletTransactionType::Credit,
        Some(*debit.id.as_uuid()),
        format!("Reversal of overdrawn debit: {}", debit.description),
        debit.created_by,
        debit.created_at,
    )?;
    append(uow, &compensation).await?;
    Ok(DebitOutcome::Compensated)
}
