//! Authorization adapters.
//!
//! - `role_policy` - role and ownership checks driven by the actor's role

mod role_policy;

pub use role_policy::RoleAccessPolicy;
