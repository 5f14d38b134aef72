use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{Money, Timestamp, UserId, ValidationError, WalletTransactionId};

/// Reason a ledger row exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletTransactionType {
    Credit,
    ManualAdjustment,
    MembershipRenewal,
    MembershipUpgrade,
    SessionBooking,
    AddOnPurchase,
    Overpayment,
    Refund,
}

impl WalletTransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletTransactionType::Credit => "credit",
            WalletTransactionType::ManualAdjustment => "manual_adjustment",
            WalletTransactionType::MembershipRenewal => "membership_renewal",
            WalletTransactionType::MembershipUpgrade => "membership_upgrade",
            WalletTransactionType::SessionBooking => "session_booking",
            WalletTransactionType::AddOnPurchase => "add_on_purchase",
            WalletTransactionType::Overpayment => "overpayment",
            WalletTransactionType::Refund => "refund",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        use WalletTransactionType::*;
        [
            Credit,
            ManualAdjustment,
            MembershipRenewal,
            MembershipUpgrade,
            SessionBooking,
            AddOnPurchase,
            Overpayment,
            Refund,
        ]
        .into_iter()
        .find(|t| t.as_str() == s)
    }
}

/// One immutable ledger row. Credits are positive, debits negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: WalletTransactionId,
    pub member_id: UserId,
    pub amount: Money,
    pub transaction_type: WalletTransactionType,
    /// Membership, session or other record this row settles.
    pub reference_id: Option<Uuid>,
    pub description: String,
    pub created_by: UserId,
    pub created_at: Timestamp,
}

impl WalletTransaction {
    /// A positive ledger row.
    ///
    /// # Errors
    ///
    /// `amount` must be strictly positive.
    pub fn credit(
        member_id: UserId,
        amount: Money,
        transaction_type: WalletTransactionType,
        reference_id: Option<Uuid>,
        description: impl Into<String>,
        created_by: UserId,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        if !amount.is_positive() {
            return Err(ValidationError::invalid_format("amount", "credit must be positive"));
        }
        Ok(Self::row(
            member_id,
            amount,
            transaction_type,
            reference_id,
            description,
            created_by,
            now,
        ))
    }

    /// A negative ledger row for `amount` (given as a positive value).
    pub fn debit(
        member_id: UserId,
        amount: Money,
        transaction_type: WalletTransactionType,
        reference_id: Option<Uuid>,
        description: impl Into<String>,
        created_by: UserId,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        if !amount.is_positive() {
            return Err(ValidationError::invalid_format("amount", "debit must be positive"));
        }
        Ok(Self::row(
            member_id,
            -amount,
            transaction_type,
            reference_id,
            description,
            created_by,
            now,
        ))
    }

    fn row(
        member_id: UserId,
        amount: Money,
        transaction_type: WalletTransactionType,
        reference_id: Option<Uuid>,
        description: impl Into<String>,
        created_by: UserId,
        now: Timestamp,
    ) -> Self {
        Self {
            id: WalletTransactionId::new(),
            member_id,
            amount,
            transaction_type,
            reference_id,
            description: description.into(),
            created_by,
            created_at: now,
        }
    }

    pub fn is_debit(&self) -> bool {
        self.amount.is_negative()
    }
}

/// Balance implied by a set of ledger rows.
pub fn balance_of<'a>(rows: impl IntoIterator<Item = &'a WalletTransaction>) -> Money {
    rows.into_iter().map(|t| t.amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn credit(units: i64) -> WalletTransaction {
        WalletTransaction::credit(
            UserId::new(),
            Money::from_units(units),
            WalletTransactionType::Credit,
            None,
            "top-up",
            UserId::new(),
            Timestamp::now(),
        )
        .unwrap()
    }

    #[test]
    fn debit_is_stored_negative() {
        let tx = WalletTransaction::debit(
            UserId::new(),
            Money::from_units(80),
            WalletTransactionType::MembershipUpgrade,
            None,
            "upgrade",
            UserId::new(),
            Timestamp::now(),
        )
        .unwrap();
        assert_eq!(tx.amount, Money::from_units(-80));
        assert!(tx.is_debit());
    }

    #[test]
    fn zero_amounts_are_rejected() {
        let result = WalletTransaction::credit(
            UserId::new(),
            Money::ZERO,
            WalletTransactionType::Credit,
            None,
            "nothing",
            UserId::new(),
            Timestamp::now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn balance_sums_rows() {
        let rows = vec![credit(100), credit(50)];
        assert_eq!(balance_of(&rows), Money::from_units(150));
        assert_eq!(balance_of(&Vec::new()), Money::ZERO);
    }

    #[test]
    fn type_names_round_trip() {
        assert_eq!(
            WalletTransactionType::parse("add_on_purchase"),
            Some(WalletTransactionType::AddOnPurchase)
        );
        assert_eq!(WalletTransactionType::parse("bonus"), None);
    }

    proptest! {
        #[test]
        fn balance_equals_credits_minus_debits(
            credits in proptest::collection::vec(1i64..10_000, 0..20),
            debits in proptest::collection::vec(1i64..10_000, 0..20),
        ) {
            let member = UserId::new();
            let mut rows = Vec::new();
            for c in &credits {
                rows.push(WalletTransaction::credit(
                    member, Money::from_cents(*c), WalletTransactionType::Credit,
                    None, "c", member, Timestamp::now()).unwrap());
            }
            for d in &debits {
                rows.push(WalletTransaction::debit(
                    member, Money::from_cents(*d), WalletTransactionType::SessionBooking,
                    None, "d", member, Timestamp::now()).unwrap());
            }
            let expected = credits.iter().sum::<i64>() - debits.iter().sum::<i64>();
            prop_assert_eq!(balance_of(&rows), Money::from_cents(expected));
        }
    }
}
