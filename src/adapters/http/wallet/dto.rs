//! HTTP DTOs for wallet endpoints.

use serde::Deserialize;

use crate::domain::foundation::Money;

#[derive(Debug, Clone, Deserialize)]
pub struct TopUpRequest {
    pub amount: Money,
    #[serde(default)]
    pub description: Option<String>,
}

/// Signed amount; negative values debit the wallet.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustmentRequest {
    pub amount: Money,
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionChargeRequest {
    pub amount: Money,
    pub session_ref: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddOnRequest {
    pub amount: Money,
    pub description: String,
}
