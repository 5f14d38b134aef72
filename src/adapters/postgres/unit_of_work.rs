//! Transaction-backed unit of work.
//!
//! One `PgUnitOfWork` wraps one database transaction. Every repository
//! method runs on that transaction's connection; dropping the unit of work
//! without calling `commit` rolls the transaction back.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{
    CommissionRepository, InvoiceRepository, MembershipRepository, PaymentRepository,
    PlanRepository, TrainerAssignmentRepository, UnitOfWork, UnitOfWorkFactory, UserRepository,
    WalletRepository,
};

/// Partial unique index backing the single-open-membership rule.
pub(super) const SINGLE_OPEN_INDEX: &str = "memberships_single_open_idx";

/// Partial unique index on `lower(name)` for live plans.
pub(super) const PLAN_NAME_INDEX: &str = "membership_plans_live_name_idx";

pub(super) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

/// Name of the violated unique constraint, if that is what failed.
pub(super) fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => db_err.constraint(),
        _ => None,
    }
}

/// Opens one transaction per unit of work.
#[derive(Clone)]
pub struct PgUnitOfWorkFactory {
    pool: PgPool,
}

impl PgUnitOfWorkFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWorkFactory for PgUnitOfWorkFactory {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

pub struct PgUnitOfWork {
    pub(super) tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    fn members(&mut self) -> &mut dyn UserRepository {
        self
    }

    fn trainer_assignments(&mut self) -> &mut dyn TrainerAssignmentRepository {
        self
    }

    fn plans(&mut self) -> &mut dyn PlanRepository {
        self
    }

    fn memberships(&mut self) -> &mut dyn MembershipRepository {
        self
    }

    fn payments(&mut self) -> &mut dyn PaymentRepository {
        self
    }

    fn wallet(&mut self) -> &mut dyn WalletRepository {
        self
    }

    fn commissions(&mut self) -> &mut dyn CommissionRepository {
        self
    }

    fn invoices(&mut self) -> &mut dyn InvoiceRepository {
        self
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(db_error("Failed to commit transaction"))
    }
}
