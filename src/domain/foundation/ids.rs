//! Strongly-typed identifier value objects.
//!
//! Every aggregate gets its own UUID newtype so a `PlanId` can never be
//! passed where a `MembershipId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Declares a UUID-backed identifier with the usual constructors.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Identifier of any user account (member, trainer or admin).
    UserId
);

uuid_id!(
    /// Identifier of a gym branch.
    BranchId
);

uuid_id!(
    /// Identifier of a membership plan.
    PlanId
);

uuid_id!(
    /// Identifier of a membership.
    MembershipId
);

uuid_id!(
    /// Identifier of a payment attempt against a membership.
    PaymentId
);

uuid_id!(
    /// Identifier of a wallet ledger row.
    WalletTransactionId
);

uuid_id!(
    /// Identifier of a trainer commission.
    CommissionId
);

uuid_id!(InvoiceId);
