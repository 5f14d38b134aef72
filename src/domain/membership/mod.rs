//! Membership domain module.
//!
//! # Module Structure
//!
//! - `plan` - MembershipPlan catalogue entry and pricing
//! - `aggregate` - Membership aggregate entity
//! - `status` - MembershipStatus state machine
//! - `source` - InGym / Online origin
//! - `errors` - MembershipError, the engine-wide operation error

mod aggregate;
mod errors;
pub(crate) mod plan;
mod source;
mod status;

pub use aggregate::{Membership, NewMembership};
pub use errors::MembershipError;
pub use plan::{MembershipPlan, PlanDetails};
pub use source::MembershipSource;
pub use status::MembershipStatus;
