//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, error types and the identity
//! model that form the vocabulary of the billing domain.

mod auth;
mod authorization;
mod errors;
mod ids;
mod money;
mod percentage;
mod state_machine;
mod timestamp;

pub use auth::{Actor, AuthError, Role};
pub use authorization::{ensure_branch_access, BranchScoped};
pub use errors::{DomainError, ErrorCategory, ErrorCode, ValidationError};
pub use ids::{
    BranchId, CommissionId, InvoiceId, MembershipId, PaymentId, PlanId, UserId,
    WalletTransactionId,
};
pub use money::{round_money, Money};
pub use percentage::Percentage;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
