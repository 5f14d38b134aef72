//! Payment gateway selection port.
//!
//! Gateways perform no network calls. They only decide the default
//! payment method and initial status for a subscription source.

use crate::domain::membership::MembershipSource;
use crate::domain::payment::{PaymentMethod, PaymentStatus};

pub trait PaymentGateway: Send + Sync {
    /// Name the gateway is selected by in configuration.
    fn name(&self) -> &'static str;

    /// Default `(method, status)` for a subscription from `source`.
    fn classify(&self, source: MembershipSource) -> (PaymentMethod, PaymentStatus);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn PaymentGateway) {}
    }
}
