//! HTTP DTOs for plan catalogue endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BranchId, Money, Percentage};
use crate::domain::membership::{MembershipPlan, PlanDetails};

/// Body of both create and update. Omitted perks default to off.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanRequest {
    pub name: String,
    #[serde(default)]
    pub branch_id: Option<BranchId>,
    pub duration_days: u32,
    pub price: Money,
    #[serde(default = "zero_percent")]
    pub session_discount: Percentage,
    #[serde(default)]
    pub sessions_per_month: u32,
    #[serde(default)]
    pub priority_booking: bool,
    #[serde(default)]
    pub add_on_access: bool,
    #[serde(default = "zero_percent")]
    pub commission_rate: Percentage,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn zero_percent() -> Percentage {
    Percentage::ZERO
}

fn active_by_default() -> bool {
    true
}

impl From<PlanRequest> for PlanDetails {
    fn from(req: PlanRequest) -> Self {
        Self {
            name: req.name,
            branch_id: req.branch_id,
            duration_days: req.duration_days,
            price: req.price,
            session_discount: req.session_discount,
            sessions_per_month: req.sessions_per_month,
            priority_booking: req.priority_booking,
            add_on_access: req.add_on_access,
            commission_rate: req.commission_rate,
            is_active: req.is_active,
        }
    }
}

/// A plan as shown in the catalogue, with the price after discount.
#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    #[serde(flatten)]
    pub plan: MembershipPlan,
    pub effective_price: Money,
}

impl From<MembershipPlan> for PlanResponse {
    fn from(plan: MembershipPlan) -> Self {
        Self {
            effective_price: plan.effective_price(),
            plan,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanListResponse {
    pub plans: Vec<PlanResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_request_defaults_perks_off() {
        let req: PlanRequest =
            serde_json::from_str(r#"{"name":"Basic","duration_days":30,"price":"50"}"#).unwrap();
        let details = PlanDetails::from(req);

        assert_eq!(details.session_discount, Percentage::ZERO);
        assert_eq!(details.commission_rate, Percentage::ZERO);
        assert!(details.is_active);
        assert!(!details.add_on_access);
        assert!(details.branch_id.is_none());
    }

    #[test]
    fn out_of_range_discount_is_rejected_at_parse() {
        let result: Result<PlanRequest, _> = serde_json::from_str(
            r#"{"name":"Basic","duration_days":30,"price":"50","session_discount":"150"}"#,
        );
        assert!(result.is_err());
    }
}
