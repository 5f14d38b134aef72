//! User accounts as a tagged union over roles.
//!
//! Lookups resolve the account first and then match on the role-specific
//! profile, so there is no member/trainer subtype hierarchy.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BranchId, BranchScoped, Money, Role, Timestamp, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
    /// Read cache of the ledger sum. Never used for authorisation decisions.
    pub wallet_balance: Money,
    pub joined_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerProfile {
    pub specialization: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleProfile {
    Member(MemberProfile),
    Trainer(TrainerProfile),
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub branch_id: Option<BranchId>,
    pub is_active: bool,
    pub profile: RoleProfile,
}

impl UserAccount {
    pub fn new_member(
        id: UserId,
        full_name: impl Into<String>,
        email: impl Into<String>,
        branch_id: Option<BranchId>,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            email: email.into(),
            branch_id,
            is_active: true,
            profile: RoleProfile::Member(MemberProfile {
                wallet_balance: Money::ZERO,
                joined_at: now,
            }),
        }
    }

    pub fn new_trainer(
        id: UserId,
        full_name: impl Into<String>,
        email: impl Into<String>,
        branch_id: Option<BranchId>,
    ) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            email: email.into(),
            branch_id,
            is_active: true,
            profile: RoleProfile::Trainer(TrainerProfile {
                specialization: None,
            }),
        }
    }

    pub fn role(&self) -> Role {
        match self.profile {
            RoleProfile::Member(_) => Role::Member,
            RoleProfile::Trainer(_) => Role::Trainer,
            RoleProfile::Admin => Role::Admin,
        }
    }

    pub fn member_profile(&self) -> Option<&MemberProfile> {
        match &self.profile {
            RoleProfile::Member(profile) => Some(profile),
            _ => None,
        }
    }

    /// Overwrites the cached wallet balance. No-op for non-members.
    pub fn sync_wallet_balance(&mut self, balance: Money) {
        if let RoleProfile::Member(profile) = &mut self.profile {
            profile.wallet_balance = balance;
        }
    }
}

impl BranchScoped for UserAccount {
    fn branch_id(&self) -> Option<BranchId> {
        self.branch_id
    }
}

/// Links a member to a trainer. The most recent assignment wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerAssignment {
    pub member_id: UserId,
    pub trainer_id: UserId,
    pub assigned_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_account_exposes_profile() {
        let account = UserAccount::new_member(UserId::new(), "Mona", "mona@gym.test", None, Timestamp::now());
        assert_eq!(account.role(), Role::Member);
        assert_eq!(account.member_profile().unwrap().wallet_balance, Money::ZERO);
    }

    #[test]
    fn sync_wallet_balance_only_touches_members() {
        let mut member = UserAccount::new_member(UserId::new(), "Mona", "mona@gym.test", None, Timestamp::now());
        member.sync_wallet_balance(Money::from_units(42));
        assert_eq!(member.member_profile().unwrap().wallet_balance, Money::from_units(42));

        let mut trainer = UserAccount::new_trainer(UserId::new(), "Tarek", "tarek@gym.test", None);
        trainer.sync_wallet_balance(Money::from_units(42));
        assert!(trainer.member_profile().is_none());
        assert_eq!(trainer.role(), Role::Trainer);
    }

    #[test]
    fn profile_serializes_with_role_tag() {
        let trainer = UserAccount::new_trainer(UserId::new(), "Tarek", "tarek@gym.test", None);
        let json = serde_json::to_value(&trainer).unwrap();
        assert_eq!(json["profile"]["role"], "trainer");
    }
}
