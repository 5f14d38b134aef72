//! Payment domain module.
//!
//! - `method` - payment methods and request normalisation
//! - `status` - PaymentStatus state machine
//! - `entity` - Payment entity

mod entity;
mod method;
mod status;

pub use entity::Payment;
pub use method::{normalize_method, PaymentMethod};
pub use status::PaymentStatus;
