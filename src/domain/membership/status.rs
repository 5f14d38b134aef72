//! Membership status state machine.
//!
//! ```text
//! PendingPayment ──► Active ──► Frozen ──► Active
//!       │  ▲           ├──► Expired   (terminal)
//!       └──┘           └──► Cancelled (terminal)
//!     (rejected)
//! ```

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Membership lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// Waiting for a payment to be confirmed by an admin.
    PendingPayment,

    /// Paid and usable until the end date.
    Active,

    /// Paused by the member; the freeze duration is added back on resume.
    Frozen,

    /// End date passed. Terminal.
    Expired,

    /// Cancelled by an admin, the member, or an upgrade. Terminal.
    Cancelled,
}

impl MembershipStatus {
    /// A commercially open membership blocks the member from opening another.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            MembershipStatus::PendingPayment | MembershipStatus::Active | MembershipStatus::Frozen
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::PendingPayment => "pending_payment",
            MembershipStatus::Active => "active",
            MembershipStatus::Frozen => "frozen",
            MembershipStatus::Expired => "expired",
            MembershipStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl StateMachine for MembershipStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use MembershipStatus::*;
        matches!(
            (self, target),
            (PendingPayment, Active)
                | (PendingPayment, PendingPayment) // payment rejected
                | (Active, Frozen)
                | (Active, Expired)
                | (Active, Cancelled)
                | (Frozen, Active)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use MembershipStatus::*;
        match self {
            PendingPayment => vec![Active, PendingPayment],
            Active => vec![Frozen, Expired, Cancelled],
            Frozen => vec![Active],
            Expired | Cancelled => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use MembershipStatus::*;

    const ALL: [MembershipStatus; 5] = [PendingPayment, Active, Frozen, Expired, Cancelled];

    #[test]
    fn open_statuses() {
        assert!(PendingPayment.is_open());
        assert!(Active.is_open());
        assert!(Frozen.is_open());
        assert!(!Expired.is_open());
        assert!(!Cancelled.is_open());
    }

    #[test]
    fn expired_and_cancelled_are_terminal() {
        assert!(Expired.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!Frozen.is_terminal());
    }

    #[test]
    fn frozen_can_only_resume() {
        assert_eq!(Frozen.valid_transitions(), vec![Active]);
        assert!(!Frozen.can_transition_to(&Cancelled));
        assert!(!Frozen.can_transition_to(&Expired));
    }

    #[test]
    fn pending_cannot_freeze_or_expire() {
        assert!(PendingPayment.transition_to(Frozen).is_err());
        assert!(PendingPayment.transition_to(Expired).is_err());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    from.can_transition_to(&to),
                    from.valid_transitions().contains(&to),
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn serializes_to_snake_case() {
        let json = serde_json::to_string(&PendingPayment).unwrap();
        assert_eq!(json, "\"pending_payment\"");
        assert_eq!(PendingPayment.as_str(), "pending_payment");
    }
}
