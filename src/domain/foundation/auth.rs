//! Identity types for the domain layer.
//!
//! An `Actor` is whoever is performing an operation: a member acting on
//! their own account, a trainer, a branch or platform admin, or the
//! scheduler itself. The identity source (HTTP headers, a token) is an
//! adapter concern; handlers only ever see the resolved `Actor`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use super::{BranchId, UserId};

/// Role an actor holds in the gym.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Trainer,
    Member,
    /// Background automation. Never issued to a human.
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Admin => "admin",
            Role::Trainer => "trainer",
            Role::Member => "member",
            Role::System => "system",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "trainer" => Ok(Role::Trainer),
            "member" => Ok(Role::Member),
            other => Err(AuthError::UnknownRole(other.to_string())),
        }
    }
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
    /// Home branch. `None` for platform-wide admins and the system actor.
    pub branch_id: Option<BranchId>,
}

impl Actor {
    pub fn new(user_id: UserId, role: Role, branch_id: Option<BranchId>) -> Self {
        Self {
            user_id,
            role,
            branch_id,
        }
    }

    pub fn member(user_id: UserId, branch_id: Option<BranchId>) -> Self {
        Self::new(user_id, Role::Member, branch_id)
    }

    pub fn trainer(user_id: UserId, branch_id: Option<BranchId>) -> Self {
        Self::new(user_id, Role::Trainer, branch_id)
    }

    /// Admin restricted to one branch.
    pub fn branch_admin(user_id: UserId, branch_id: BranchId) -> Self {
        Self::new(user_id, Role::Admin, Some(branch_id))
    }

    /// Admin with access to every branch.
    pub fn platform_admin(user_id: UserId) -> Self {
        Self::new(user_id, Role::Admin, None)
    }

    /// The scheduler identity used by subscription automation.
    pub fn system() -> Self {
        Self::new(UserId::from_uuid(Uuid::nil()), Role::System, None)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_system(&self) -> bool {
        self.role == Role::System
    }

    /// True for actors that bypass branch isolation.
    pub fn is_platform_wide(&self) -> bool {
        self.is_system() || (self.is_admin() && self.branch_id.is_none())
    }
}

/// Errors resolving an actor from an identity source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing identity")]
    MissingIdentity,

    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),
}
