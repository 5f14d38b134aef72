//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the engine to external systems:
//! - `postgres` - Unit of work and repositories over sqlx
//! - `memory` - In-memory unit of work for tests and local runs
//! - `http` - axum API
//! - `scheduler` - Periodic subscription sweep
//! - `auth`, `payment`, `invoice`, `notifications` - Policy, gateway and side-effect ports

pub mod auth;
pub mod http;
pub mod invoice;
pub mod memory;
pub mod notifications;
pub mod payment;
pub mod postgres;
pub mod scheduler;
