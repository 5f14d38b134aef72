use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PlanId};
use crate::domain::membership::MembershipPlan;

/// Plan catalogue persistence.
///
/// Implementations must enforce case-insensitive name uniqueness among
/// non-deleted plans with a store constraint, surfacing a violation as
/// `DuplicatePlanName`.
#[async_trait]
pub trait PlanRepository: Send {
    /// Finds a plan by id, including soft-deleted ones.
    async fn find_by_id(&mut self, id: PlanId) -> Result<Option<MembershipPlan>, DomainError>;

    /// Finds a non-deleted plan by name, ignoring case.
    async fn find_by_name(&mut self, name: &str) -> Result<Option<MembershipPlan>, DomainError>;

    /// Non-deleted plans ordered by name.
    async fn list(&mut self) -> Result<Vec<MembershipPlan>, DomainError>;

    async fn insert(&mut self, plan: &MembershipPlan) -> Result<(), DomainError>;

    async fn update(&mut self, plan: &MembershipPlan) -> Result<(), DomainError>;
}
