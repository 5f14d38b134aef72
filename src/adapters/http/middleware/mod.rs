//! HTTP middleware for axum.
//!
//! - `auth` - Caller identity extraction

pub mod auth;

pub use auth::{actor_from_headers, AuthRejection, RequireActor};
