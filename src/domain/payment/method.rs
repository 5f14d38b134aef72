//! Payment methods and normalisation of requested methods.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::foundation::{Money, ValidationError};
use crate::domain::membership::MembershipSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paid at the desk, confirmed by the admin who took it.
    Cash,

    /// Debited from the member's wallet ledger.
    Wallet,

    /// Member uploads a transfer receipt that an admin reviews.
    Proof,

    /// Legacy mobile-wallet transfer. Normalised away before use.
    VodafoneCash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Wallet => "wallet",
            PaymentMethod::Proof => "proof",
            PaymentMethod::VodafoneCash => "vodafone_cash",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "wallet" => Ok(PaymentMethod::Wallet),
            "proof" => Ok(PaymentMethod::Proof),
            "vodafone_cash" => Ok(PaymentMethod::VodafoneCash),
            other => Err(ValidationError::invalid_format(
                "payment_method",
                format!("unknown payment method '{}'", other),
            )),
        }
    }
}

/// Resolves the method actually used for a subscription request.
///
/// Rules, in order:
/// 1. any wallet amount forces `Wallet`
/// 2. admin desk (in-gym): legacy `VodafoneCash` and `Proof` collapse to `Cash`
/// 3. self-service (online): `VodafoneCash` becomes `Proof`
/// 4. admin desk may not end up with `Proof`; self-service may not use `Cash`
///
/// # Errors
///
/// Returns `InvalidFormat` on `payment_method` when rule 4 is violated.
pub fn normalize_method(
    requested: PaymentMethod,
    source: MembershipSource,
    wallet_to_use: Money,
) -> Result<PaymentMethod, ValidationError> {
    if wallet_to_use.is_positive() {
        return Ok(PaymentMethod::Wallet);
    }

    let method = match (source.is_admin_path(), requested) {
        (true, PaymentMethod::VodafoneCash | PaymentMethod::Proof) => PaymentMethod::Cash,
        (false, PaymentMethod::VodafoneCash) => PaymentMethod::Proof,
        (_, other) => other,
    };

    match (source.is_admin_path(), method) {
        (true, PaymentMethod::Proof) => Err(ValidationError::invalid_format(
            "payment_method",
            "proof payments are not accepted at the desk",
        )),
        (false, PaymentMethod::Cash) => Err(ValidationError::invalid_format(
            "payment_method",
            "cash is only accepted at the desk",
        )),
        (_, method) => Ok(method),
    }
}
