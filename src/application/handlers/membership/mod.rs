//! Membership handlers.
//!
//! ## Commands
//! - Creating memberships (wallet, desk cash, reviewed proof)
//! - Confirming, rejecting and reviewing pending payments
//! - Submitting a new proof after a rejection
//! - Upgrading, freezing, resuming and cancelling
//!
//! ## Queries
//! - Membership snapshot
//! - Member history

mod cancel_membership;
mod confirm_payment;
mod create_membership;
mod freeze_membership;
mod get_membership;
mod list_member_memberships;
mod reject_payment;
mod resume_membership;
mod review_payment;
mod submit_payment_proof;
mod upgrade_membership;

// Commands
pub use cancel_membership::{CancelMembershipCommand, CancelMembershipHandler};
pub use confirm_payment::{ConfirmPaymentCommand, ConfirmPaymentHandler};
pub use create_membership::{CreateMembershipCommand, CreateMembershipHandler};
pub use freeze_membership::{FreezeMembershipCommand, FreezeMembershipHandler};
pub use reject_payment::{RejectPaymentCommand, RejectPaymentHandler};
pub use resume_membership::{ResumeMembershipCommand, ResumeMembershipHandler};
pub use review_payment::{ReviewPaymentCommand, ReviewPaymentHandler};
pub use submit_payment_proof::{SubmitPaymentProofCommand, SubmitPaymentProofHandler};
pub use upgrade_membership::{UpgradeMembershipCommand, UpgradeMembershipHandler};

// Queries
pub use get_membership::{GetMembershipHandler, GetMembershipQuery};
pub use list_member_memberships::{ListMemberMembershipsHandler, ListMemberMembershipsQuery};
