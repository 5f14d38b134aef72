//! Role-based implementation of the `AccessPolicy` port.

use async_trait::async_trait;

use crate::domain::foundation::{Actor, DomainError, ErrorCode, Role, UserId};
use crate::ports::AccessPolicy;

/// Grants access from the actor's role alone.
///
/// Admins and the system actor pass every check. Members and trainers pass
/// only for resources they own.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleAccessPolicy;

impl RoleAccessPolicy {
    pub fn new() -> Self {
        Self
    }

    fn forbidden(actor: &Actor, reason: &str) -> DomainError {
        DomainError::new(ErrorCode::Forbidden, reason)
            .with_detail("actor", actor.user_id.to_string())
            .with_detail("role", actor.role.to_string())
    }

    fn owns(actor: &Actor, role: Role, owner: UserId) -> bool {
        actor.role == role && actor.user_id == owner
    }
}

#[async_trait]
impl AccessPolicy for RoleAccessPolicy {
    async fn ensure_admin_full_access(&self, actor: &Actor) -> Result<(), DomainError> {
        if actor.is_admin() || actor.is_system() {
            return Ok(());
        }
        tracing::debug!(actor = %actor.user_id, role = %actor.role, "Admin access denied");
        Err(Self::forbidden(actor, "Administrator access required"))
    }

    async fn ensure_member_owns_resource(
        &self,
        actor: &Actor,
        member_id: UserId,
    ) -> Result<(), DomainError> {
        if actor.is_admin() || actor.is_system() || Self::owns(actor, Role::Member, member_id) {
            return Ok(());
        }
        Err(Self::forbidden(actor, "Resource belongs to another member"))
    }

    async fn ensure_trainer_owns_resource(
        &self,
        actor: &Actor,
        trainer_id: UserId,
    ) -> Result<(), DomainError> {
        if actor.is_admin() || actor.is_system() || Self::owns(actor, Role::Trainer, trainer_id) {
            return Ok(());
        }
        Err(Self::forbidden(actor, "Resource belongs to another trainer"))
    }
}
