//! Branch isolation.
//!
//! Role checks are delegated to the `AccessPolicy` port, but branch
//! isolation is part of the engine's own correctness contract: every
//! operation that touches a branch-scoped record calls
//! [`ensure_branch_access`] before mutating anything.

use super::{Actor, BranchId, DomainError, ErrorCode};

/// Records that belong to (at most) one branch.
pub trait BranchScoped {
    fn branch_id(&self) -> Option<BranchId>;

    /// Fails with `Forbidden` unless the actor may act in this record's branch.
    fn check_branch(&self, actor: &Actor) -> Result<(), DomainError> {
        ensure_branch_access(actor, self.branch_id())
    }
}

/// Fails unless `actor` may act on a resource living in `resource_branch`.
///
/// Platform-wide admins and the system actor pass unconditionally. Everyone
/// else must share the resource's branch exactly, so a branch admin cannot
/// reach branchless records and vice versa.
pub fn ensure_branch_access(
    actor: &Actor,
    resource_branch: Option<BranchId>,
) -> Result<(), DomainError> {
    if actor.is_platform_wide() || actor.branch_id == resource_branch {
        return Ok(());
    }

    Err(DomainError::new(
        ErrorCode::Forbidden,
        "Resource belongs to a different branch",
    )
    .with_detail(
        "actor_branch",
        actor.branch_id.map(|b| b.to_string()).unwrap_or_default(),
    )
    .with_detail(
        "resource_branch",
        resource_branch.map(|b| b.to_string()).unwrap_or_default(),
    ))
}
