//! Membership plan catalogue entry.
//!
//! Plans are never hard-deleted: memberships keep referencing them after
//! they leave the catalogue, so deletion only flips `is_deleted`.

use crate::domain::foundation::{
    BranchId, BranchScoped, Money, Percentage, PlanId, Timestamp, ValidationError,
};
use serde::{Deserialize, Serialize};

/// Editable attributes of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDetails {
    pub name: String,
    pub branch_id: Option<BranchId>,
    pub duration_days: u32,
    pub price: Money,
    pub session_discount: Percentage,
    pub sessions_per_month: u32,
    pub priority_booking: bool,
    pub add_on_access: bool,
    pub commission_rate: Percentage,
    pub is_active: bool,
}

impl PlanDetails {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if self.duration_days == 0 {
            return Err(ValidationError::out_of_range(
                "duration_days",
                1,
                u32::MAX,
                self.duration_days,
            ));
        }
        if self.price.is_negative() {
            return Err(ValidationError::invalid_format("price", "must not be negative"));
        }
        Ok(())
    }
}

/// A purchasable membership plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipPlan {
    pub id: PlanId,
    pub name: String,
    /// `None` means the plan is sold in every branch.
    pub branch_id: Option<BranchId>,
    pub duration_days: u32,
    pub price: Money,
    pub session_discount: Percentage,
    pub sessions_per_month: u32,
    pub priority_booking: bool,
    pub add_on_access: bool,
    pub commission_rate: Percentage,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MembershipPlan {
    /// Creates a plan from validated details.
    ///
    /// # Errors
    ///
    /// Empty name, zero duration or a negative price.
    pub fn create(
        id: PlanId,
        details: PlanDetails,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        details.validate()?;
        Ok(Self {
            id,
            name: details.name.trim().to_string(),
            branch_id: details.branch_id,
            duration_days: details.duration_days,
            price: details.price,
            session_discount: details.session_discount,
            sessions_per_month: details.sessions_per_month,
            priority_booking: details.priority_booking,
            add_on_access: details.add_on_access,
            commission_rate: details.commission_rate,
            is_active: details.is_active,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the editable attributes.
    pub fn update(&mut self, details: PlanDetails, now: Timestamp) -> Result<(), ValidationError> {
        details.validate()?;
        self.name = details.name.trim().to_string();
        self.branch_id = details.branch_id;
        self.duration_days = details.duration_days;
        self.price = details.price;
        self.session_discount = details.session_discount;
        self.sessions_per_month = details.sessions_per_month;
        self.priority_booking = details.priority_booking;
        self.add_on_access = details.add_on_access;
        self.commission_rate = details.commission_rate;
        self.is_active = details.is_active;
        self.updated_at = now;
        Ok(())
    }

    pub fn soft_delete(&mut self, now: Timestamp) {
        self.is_deleted = true;
        self.is_active = false;
        self.updated_at = now;
    }

    /// List price after the plan's discount, rounded to cents.
    pub fn effective_price(&self) -> Money {
        self.price.discounted_by(self.session_discount)
    }

    /// Plans can be sold only while active and not deleted.
    pub fn is_purchasable(&self) -> bool {
        self.is_active && !self.is_deleted
    }

    /// Branch-restricted plans are only sold to members of that branch.
    pub fn is_available_in(&self, branch: Option<BranchId>) -> bool {
        self.branch_id.is_none() || self.branch_id == branch
    }

    /// Key used for case-insensitive name uniqueness.
    pub fn name_key(name: &str) -> String {
        name.trim().to_lowercase()
    }
}

impl BranchScoped for MembershipPlan {
    fn branch_id(&self) -> Option<BranchId> {
        self.branch_id
    }
}
