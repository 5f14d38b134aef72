//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, identity, errors)
//! - `membership` - Plans, the membership lifecycle and engine errors
//! - `payment` - Payment attempts and method normalisation
//! - `wallet` - Append-only wallet ledger rows
//! - `commission` - Trainer commissions
//! - `invoice` - Receipts for priced events
//! - `people` - User accounts and trainer assignments
//! - `notification` - Messages for members and trainers

pub mod commission;
pub mod foundation;
pub mod invoice;
pub mod membership;
pub mod notification;
pub mod payment;
pub mod people;
pub mod wallet;
