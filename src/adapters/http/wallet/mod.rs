//! Wallet HTTP endpoints.

mod dto;
mod handlers;
mod routes;

pub use routes::wallet_routes;
