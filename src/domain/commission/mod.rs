//! Trainer commission domain.
//!
//! A commission is owed to a member's current trainer when a membership
//! is activated or auto-renewed. At most one commission exists per
//! (membership, source).

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    BranchId, BranchScoped, CommissionId, MembershipId, Money, Percentage, Timestamp, UserId,
};
use crate::domain::membership::MembershipError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionSource {
    /// New or confirmed membership.
    Activation,
    /// Automatic renewal by the subscription sweep.
    Renewal,
}

impl CommissionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommissionSource::Activation => "activation",
            CommissionSource::Renewal => "renewal",
        }
    }
}

impl std::fmt::Display for CommissionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commission {
    pub id: CommissionId,
    pub trainer_id: UserId,
    pub membership_id: MembershipId,
    pub branch_id: Option<BranchId>,
    pub source: CommissionSource,
    pub percentage: Percentage,
    pub amount: Money,
    pub is_paid: bool,
    pub paid_at: Option<Timestamp>,
    pub paid_by: Option<UserId>,
    pub created_at: Timestamp,
}

impl Commission {
    /// Computes `round(base × rate / 100, 2)` for the trainer.
    pub fn calculate(
        trainer_id: UserId,
        membership_id: MembershipId,
        branch_id: Option<BranchId>,
        source: CommissionSource,
        rate: Percentage,
        base_amount: Money,
        now: Timestamp,
    ) -> Self {
        Self {
            id: CommissionId::new(),
            trainer_id,
            membership_id,
            branch_id,
            source,
            percentage: rate,
            amount: base_amount.share(rate),
            is_paid: false,
            paid_at: None,
            paid_by: None,
            created_at: now,
        }
    }

    /// Records the payout.
    ///
    /// # Errors
    ///
    /// Fails if the commission was already paid out.
    pub fn mark_paid(&mut self, paid_by: UserId, now: Timestamp) -> Result<(), MembershipError> {
        if self.is_paid {
            return Err(MembershipError::commission_already_paid(self.id));
        }
        self.is_paid = true;
        self.paid_at = Some(now);
        self.paid_by = Some(paid_by);
        Ok(())
    }
}

impl BranchScoped for Commission {
    fn branch_id(&self) -> Option<BranchId> {
        self.branch_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use rust_decimal::Decimal;

    fn commission(rate: Decimal, base: Money) -> Commission {
        Commission::calculate(
            UserId::new(),
            MembershipId::new(),
            None,
            CommissionSource::Activation,
            Percentage::try_new(rate).unwrap(),
            base,
            Timestamp::now(),
        )
    }

    #[test]
    fn amount_is_rounded_share_of_base() {
        let c = commission(Decimal::from(10), Money::from_units(100));
        assert_eq!(c.amount, Money::from_units(10));

        // 7.5% of 33.33 = 2.49975
        let c = commission(Decimal::new(75, 1), Money::from_cents(3333));
        assert_eq!(c.amount, Money::from_cents(250));
    }

    #[test]
    fn zero_rate_yields_zero_commission() {
        let c = commission(Decimal::ZERO, Money::from_units(100));
        assert_eq!(c.amount, Money::ZERO);
    }

    #[test]
    fn mark_paid_once() {
        let mut c = commission(Decimal::from(10), Money::from_units(100));
        let admin = UserId::new();
        c.mark_paid(admin, Timestamp::now()).unwrap();
        assert!(c.is_paid);
        assert_eq!(c.paid_by, Some(admin));

        let err = c.mark_paid(admin, Timestamp::now()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::CommissionAlreadyPaid);
    }
}
