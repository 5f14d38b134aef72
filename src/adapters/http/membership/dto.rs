//! HTTP DTOs for membership and payment endpoints.

use serde::{Deserialize, Serialize};

use crate::application::MembershipSnapshot;
use crate::domain::foundation::{Money, PlanId, Timestamp};
use crate::domain::membership::{Membership, MembershipSource, MembershipStatus};
use crate::domain::payment::{Payment, PaymentMethod, PaymentStatus};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMembershipRequest {
    pub plan_id: PlanId,
    pub source: MembershipSource,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// Cash handed over or the amount on the proof.
    #[serde(default)]
    pub amount: Money,
    #[serde(default)]
    pub wallet_to_use: Money,
    #[serde(default)]
    pub auto_renew: bool,
    #[serde(default)]
    pub proof_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitProofRequest {
    pub amount: Money,
    #[serde(default)]
    pub proof_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RejectPaymentRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewPaymentRequest {
    pub approve: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeMembershipRequest {
    pub new_plan_id: PlanId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FreezeMembershipRequest {
    /// Defaults to now.
    #[serde(default)]
    pub start: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelMembershipRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A membership with its payment history and the fields clients poll on.
#[derive(Debug, Clone, Serialize)]
pub struct MembershipResponse {
    pub membership: Membership,
    pub payments: Vec<Payment>,
    pub status: MembershipStatus,
    /// Status of the most recent payment, if any.
    pub payment_status: Option<PaymentStatus>,
}

impl From<MembershipSnapshot> for MembershipResponse {
    fn from(snapshot: MembershipSnapshot) -> Self {
        let payment_status = snapshot.latest_payment().map(|p| p.status);
        Self {
            status: snapshot.membership.status,
            payment_status,
            membership: snapshot.membership,
            payments: snapshot.payments,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MembershipListResponse {
    pub memberships: Vec<Membership>,
    pub total: usize,
}

impl From<Vec<Membership>> for MembershipListResponse {
    fn from(memberships: Vec<Membership>) -> Self {
        Self {
            total: memberships.len(),
            memberships,
        }
    }
}
