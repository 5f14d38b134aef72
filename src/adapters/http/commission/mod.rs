//! Trainer commission HTTP endpoints.

mod handlers;
mod routes;

pub use routes::commission_routes;
