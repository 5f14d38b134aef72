use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Payment review status.
///
/// `Paid` is used for wallet settlements that need no review;
/// `Confirmed` for payments an admin has accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Confirmed,
    Rejected,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Confirmed => "confirmed",
            PaymentStatus::Rejected => "rejected",
        }
    }

    /// Money has actually been received.
    pub fn is_settled(&self) -> bool {
        matches!(self, PaymentStatus::Paid | PaymentStatus::Confirmed)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl StateMachine for PaymentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentStatus::*;
        matches!((self, target), (Pending, Confirmed) | (Pending, Rejected))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentStatus::*;
        match self {
            Pending => vec![Confirmed, Rejected],
            Paid | Confirmed | Rejected => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_can_be_reviewed() {
        assert!(PaymentStatus::Pending.can_transition_to(&PaymentStatus::Confirmed));
        assert!(PaymentStatus::Pending.can_transition_to(&PaymentStatus::Rejected));
        assert!(PaymentStatus::Rejected.is_terminal());
        assert!(PaymentStatus::Paid.is_terminal());
    }

    #[test]
    fn settled_statuses() {
        assert!(PaymentStatus::Paid.is_settled());
        assert!(PaymentStatus::Confirmed.is_settled());
        assert!(!PaymentStatus::Pending.is_settled());
        assert!(!PaymentStatus::Rejected.is_settled());
    }
}
