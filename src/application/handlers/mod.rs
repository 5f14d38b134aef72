//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations. Each
//! command runs in a single unit of work; side effects are dispatched only
//! after it commits.

pub mod automation;
pub mod commission;
pub mod membership;
pub mod plan;
pub mod wallet;

#[cfg(test)]
pub(crate) mod test_support;
