//! PostgreSQL adapters - Database implementations for the persistence ports.
//!
//! A single `PgUnitOfWork` implements every repository over one
//! transaction. Row locks (`SELECT ... FOR UPDATE`) serialise mutations on
//! the same member, membership, payment or commission; partial unique
//! indexes back the single-open-membership and live-plan-name rules.
//!
//! Schema: `migrations/`.

mod commissions;
mod invoices;
mod memberships;
mod payments;
mod plans;
mod rows;
mod unit_of_work;
mod users;
mod wallet;

pub use unit_of_work::{PgUnitOfWork, PgUnitOfWorkFactory};
