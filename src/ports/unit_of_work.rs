//! Transaction boundary port.
//!
//! Every multi-step mutation runs inside one unit of work: begin, read and
//! write through the repository accessors, then commit. Dropping a unit of
//! work without committing rolls everything back, which is also what happens
//! when a request future is cancelled mid-flight.
//!
//! # Example
//!
//! ```ignore
//! let mut uow = self.uow.begin().await?;
//! let mut membership = uow
//!     .memberships()
//!     .find_for_update(cmd.membership_id)
//!     .await?
//!     .ok_or_else(|| MembershipError::not_found(cmd.membership_id))?;
//! membership.freeze(cmd.start, now)?;
//! uow.memberships().update(&membership).await?;
//! uow.commit().await?;
//! ```

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

use super::{
    CommissionRepository, InvoiceRepository, MembershipRepository, PaymentRepository,
    PlanRepository, TrainerAssignmentRepository, UserRepository, WalletRepository,
};

/// An open transaction over every repository the engine writes to.
///
/// Reads through a unit of work see its own uncommitted writes.
#[async_trait]
pub trait UnitOfWork: Send {
    fn members(&mut self) -> &mut dyn UserRepository;

    fn trainer_assignments(&mut self) -> &mut dyn TrainerAssignmentRepository;

    fn plans(&mut self) -> &mut dyn PlanRepository;

    fn memberships(&mut self) -> &mut dyn MembershipRepository;

    fn payments(&mut self) -> &mut dyn PaymentRepository;

    fn wallet(&mut self) -> &mut dyn WalletRepository;

    fn commissions(&mut self) -> &mut dyn CommissionRepository;

    fn invoices(&mut self) -> &mut dyn InvoiceRepository;

    /// Atomically publishes every write made through this unit of work.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` if the store refuses the commit; nothing is published
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;
}

/// Opens units of work.
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, DomainError>;
}
