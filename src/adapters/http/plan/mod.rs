//! Plan catalogue HTTP endpoints.

mod dto;
mod handlers;
mod routes;

pub use routes::plan_routes;
