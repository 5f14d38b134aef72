//! Payment gateway selection

use serde::Deserialize;

use super::error::ValidationError;

const KNOWN_GATEWAYS: [&str; 2] = ["manual", "online"];

/// Which gateway classifies new subscriptions
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// `manual` or `online`
    #[serde(default = "default_gateway")]
    pub gateway: String,
}

impl PaymentConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name = self.gateway.trim().to_ascii_lowercase();
        if !KNOWN_GATEWAYS.contains(&name.as_str()) {
            return Err(ValidationError::UnknownPaymentGateway(self.gateway.clone()));
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            gateway: default_gateway(),
        }
    }
}

fn default_gateway() -> String {
    "manual".to_string()
}
