//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers own transaction boundaries; `services` holds the ledger,
//! commission and side-effect helpers they share.

pub mod handlers;
pub mod services;

pub use services::{MembershipSnapshot, PostCommit, SideEffects};
