//! Gym Billing - Membership, wallet and commission engine
//!
//! Keeps a gym's money consistent: membership lifecycles and their payments,
//! an append-only wallet ledger per member, trainer commissions earned on
//! sales and renewals, and a periodic sweep that expires or auto-renews
//! subscriptions.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
