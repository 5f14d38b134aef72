//! Role and ownership checks.
//!
//! Branch isolation is not part of this port; the engine enforces it
//! inline through `ensure_branch_access`.

use async_trait::async_trait;

use crate::domain::foundation::{Actor, DomainError, UserId};

/// Port for role-based authorization.
///
/// Every method returns `Forbidden` when the actor is not allowed.
#[async_trait]
pub trait AccessPolicy: Send + Sync {
    /// Actor must have full administrative access.
    async fn ensure_admin_full_access(&self, actor: &Actor) -> Result<(), DomainError>;

    /// Actor must be the member who owns the resource, or an admin.
    async fn ensure_member_owns_resource(
        &self,
        actor: &Actor,
        member_id: UserId,
    ) -> Result<(), DomainError>;

    /// Actor must be the trainer who owns the resource, or an admin.
    async fn ensure_trainer_owns_resource(
        &self,
        actor: &Actor,
        trainer_id: UserId,
    ) -> Result<(), DomainError>;
}
