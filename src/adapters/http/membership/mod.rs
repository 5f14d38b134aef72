//! Membership and payment HTTP endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{CreateMembershipRequest, MembershipListResponse, MembershipResponse};
pub use routes::membership_routes;
