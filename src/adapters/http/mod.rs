//! HTTP adapter - axum routers, request DTOs and error mapping.
//!
//! Each area (memberships, wallet, plans, commissions) has its own
//! `dto`/`handlers`/`routes` split; `router::build_app` stitches them
//! together under `/api` with the tower-http layers.

pub mod automation;
pub mod commission;
pub mod error;
pub mod membership;
pub mod middleware;
pub mod plan;
pub mod router;
pub mod state;
pub mod wallet;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{ApiError, ErrorResponse};
pub use router::{api_routes, build_app};
pub use state::AppState;
