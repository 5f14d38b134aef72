//! Payment gateway adapters.
//!
//! Neither gateway talks to a payment processor. They decide how a new
//! subscription is paid for when the request names no method.

use crate::config::ConfigError;
use crate::domain::membership::MembershipSource;
use crate::domain::payment::{PaymentMethod, PaymentStatus};
use crate::ports::PaymentGateway;

/// Desk-first gateway: cash at the gym, reviewed proof online.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualGateway;

impl PaymentGateway for ManualGateway {
    fn name(&self) -> &'static str {
        "manual"
    }

    fn classify(&self, source: MembershipSource) -> (PaymentMethod, PaymentStatus) {
        match source {
            MembershipSource::InGym => (PaymentMethod::Cash, PaymentStatus::Confirmed),
            MembershipSource::Online => (PaymentMethod::Proof, PaymentStatus::Pending),
        }
    }
}

/// Placeholder for a hosted checkout. Every online payment stays pending
/// until an admin reviews it.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnlineGateway;

impl PaymentGateway for OnlineGateway {
    fn name(&self) -> &'static str {
        "online"
    }

    fn classify(&self, source: MembershipSource) -> (PaymentMethod, PaymentStatus) {
        match source {
            MembershipSource::InGym => (PaymentMethod::Cash, PaymentStatus::Confirmed),
            MembershipSource::Online => (PaymentMethod::VodafoneCash, PaymentStatus::Pending),
        }
    }
}

/// Resolves the configured gateway name.
///
/// # Errors
///
/// Unknown names are a configuration error.
pub fn gateway_from_name(name: &str) -> Result<Box<dyn PaymentGateway>, ConfigError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "manual" => Ok(Box::new(ManualGateway)),
        "online" => Ok(Box::new(OnlineGateway)),
        other => Err(ConfigError::UnknownPaymentGateway(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_gateway_splits_by_source() {
        let gateway = ManualGateway;
        assert_eq!(
            gateway.classify(MembershipSource::InGym),
            (PaymentMethod::Cash, PaymentStatus::Confirmed)
        );
        assert_eq!(
            gateway.classify(MembershipSource::Online),
            (PaymentMethod::Proof, PaymentStatus::Pending)
        );
    }

    #[test]
    fn gateway_lookup_is_case_insensitive() {
        assert_eq!(gateway_from_name("Manual").unwrap().name(), "manual");
        assert_eq!(gateway_from_name("online").unwrap().name(), "online");
    }

    #[test]
    fn unknown_gateway_is_config_error() {
        assert!(matches!(
            gateway_from_name("stripe"),
            Err(ConfigError::UnknownPaymentGateway(name)) if name == "stripe"
        ));
    }
}
