//! Membership aggregate entity.
//!
//! A membership ties one member to one plan for a period of time.
//! Memberships are never deleted; they move through the status machine
//! and end in `Expired` or `Cancelled`.
//!
//! # Invariants
//!
//! - Status transitions follow [`MembershipStatus`] rules
//! - `start_date <= end_date`
//! - `freeze_start` is set exactly while the membership is `Frozen`
//! - At most one commercially open membership per member (enforced by
//!   the unit of work and the store, not by this type)

use crate::domain::foundation::{
    BranchId, BranchScoped, DomainError, ErrorCode, MembershipId, Money, PlanId, StateMachine,
    Timestamp, UserId,
};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::{MembershipPlan, MembershipSource, MembershipStatus};

/// Parameters shared by every way of opening a membership.
#[derive(Debug, Clone)]
pub struct NewMembership {
    pub id: MembershipId,
    pub member_id: UserId,
    pub branch_id: Option<BranchId>,
    pub source: MembershipSource,
    pub auto_renew: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: MembershipId,
    pub member_id: UserId,
    pub plan_id: PlanId,
    pub branch_id: Option<BranchId>,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub status: MembershipStatus,
    pub source: MembershipSource,
    pub auto_renew: bool,

    /// Total amount settled for this membership, cash and wallet combined.
    pub total_paid: Money,

    /// Portion of `total_paid` that came out of the member's wallet.
    pub wallet_contribution: Money,

    pub freeze_start: Option<Timestamp>,
    pub freeze_end: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub cancelled_at: Option<Timestamp>,
}

impl Membership {
    /// Opens a membership awaiting payment review.
    ///
    /// Dates are provisional; activation restarts the period.
    pub fn open_pending(new: NewMembership, plan: &MembershipPlan, now: Timestamp) -> Self {
        Self::build(new, plan, MembershipStatus::PendingPayment, now)
    }

    /// Opens a membership that is already paid for.
    pub fn open_active(
        new: NewMembership,
        plan: &MembershipPlan,
        total_paid: Money,
        wallet_contribution: Money,
        now: Timestamp,
    ) -> Self {
        let mut membership = Self::build(new, plan, MembershipStatus::Active, now);
        membership.total_paid = total_paid;
        membership.wallet_contribution = wallet_contribution;
        membership
    }

    fn build(
        new: NewMembership,
        plan: &MembershipPlan,
        status: MembershipStatus,
        now: Timestamp,
    ) -> Self {
        Self {
            id: new.id,
            member_id: new.member_id,
            plan_id: plan.id,
            branch_id: new.branch_id,
            start_date: now,
            end_date: now.add_days(i64::from(plan.duration_days)),
            status,
            source: new.source,
            auto_renew: new.auto_renew,
            total_paid: Money::ZERO,
            wallet_contribution: Money::ZERO,
            freeze_start: None,
            freeze_end: None,
            created_at: now,
            updated_at: now,
            cancelled_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Active and past its end date.
    pub fn is_lapsed(&self, now: Timestamp) -> bool {
        self.status == MembershipStatus::Active && self.end_date.is_before(&now)
    }

    /// Active and ending within `days` from `now` (inclusive), not yet lapsed.
    pub fn expires_within(&self, now: Timestamp, days: i64) -> bool {
        self.status == MembershipStatus::Active
            && !self.end_date.is_before(&now)
            && !self.end_date.is_after(&now.add_days(days))
    }

    /// Activates after a confirmed payment, starting a fresh period.
    ///
    /// # Errors
    ///
    /// Returns error if the membership is not awaiting payment.
    pub fn activate(
        &mut self,
        duration_days: u32,
        total_paid: Money,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        self.transition_to(MembershipStatus::Active)?;
        self.start_date = now;
        self.end_date = now.add_days(i64::from(duration_days));
        self.total_paid = total_paid;
        self.updated_at = now;
        Ok(())
    }

    /// Returns the membership to `PendingPayment` after a rejected payment.
    ///
    /// Zeroes the settled amounts and returns the wallet contribution
    /// that has to be refunded to the member.
    pub fn reset_to_pending(&mut self, now: Timestamp) -> Result<Money, DomainError> {
        self.transition_to(MembershipStatus::PendingPayment)?;
        let refund = self.wallet_contribution;
        self.wallet_contribution = Money::ZERO;
        self.total_paid = Money::ZERO;
        self.updated_at = now;
        Ok(refund)
    }

    pub fn freeze(&mut self, start: Timestamp, now: Timestamp) -> Result<(), DomainError> {
        self.transition_to(MembershipStatus::Frozen)?;
        self.freeze_start = Some(start);
        self.freeze_end = None;
        self.updated_at = now;
        Ok(())
    }

    /// Resumes a frozen membership, pushing the end date out by the time
    /// spent frozen. A freeze that starts in the future adds nothing.
    pub fn resume(&mut self, now: Timestamp) -> Result<Duration, DomainError> {
        self.transition_to(MembershipStatus::Active)?;
        let frozen_for = self
            .freeze_start
            .map(|start| now.duration_since(&start))
            .filter(|d| *d > Duration::zero())
            .unwrap_or_else(Duration::zero);
        self.end_date = self.end_date.add_duration(frozen_for);
        self.freeze_start = None;
        self.freeze_end = Some(now);
        self.updated_at = now;
        Ok(frozen_for)
    }

    pub fn cancel(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.transition_to(MembershipStatus::Cancelled)?;
        self.cancelled_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    pub fn expire(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.transition_to(MembershipStatus::Expired)?;
        self.updated_at = now;
        Ok(())
    }

    fn transition_to(&mut self, target: MembershipStatus) -> Result<(), DomainError> {
        let current = self.status;
        self.status = current.transition_to(target).map_err(|e| {
            DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
                .with_detail("current", current.as_str())
                .with_detail("attempted", target.as_str())
        })?;
        Ok(())
    }
}

impl BranchScoped for Membership {
    fn branch_id(&self) -> Option<BranchId> {
        self.branch_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::membership::plan::tests::details;

    fn plan() -> MembershipPlan {
        MembershipPlan::create(PlanId::new(), details("Gold", 100), Timestamp::now()).unwrap()
    }

    fn new_membership() -> NewMembership {
        NewMembership {
            id: MembershipId::new(),
            member_id: UserId::new(),
            branch_id: None,
            source: MembershipSource::Online,
            auto_renew: false,
        }
    }

    fn active(now: Timestamp) -> Membership {
        Membership::open_active(
            new_membership(),
            &plan(),
            Money::from_units(100),
            Money::ZERO,
            now,
        )
    }

    // Construction tests

    #[test]
    fn open_pending_uses_plan_duration() {
        let now = Timestamp::now();
        let m = Membership::open_pending(new_membership(), &plan(), now);
        assert_eq!(m.status, MembershipStatus::PendingPayment);
        assert_eq!(m.end_date, now.add_days(30));
        assert_eq!(m.total_paid, Money::ZERO);
    }

    #[test]
    fn open_active_records_amounts() {
        let now = Timestamp::now();
        let m = Membership::open_active(
            new_membership(),
            &plan(),
            Money::from_units(80),
            Money::from_units(80),
            now,
        );
        assert_eq!(m.status, MembershipStatus::Active);
        assert_eq!(m.wallet_contribution, Money::from_units(80));
    }

    // Activation / rejection tests

    #[test]
    fn activate_restarts_period() {
        let created = Timestamp::now();
        let mut m = Membership::open_pending(new_membership(), &plan(), created);
        let later = created.add_days(3);
        m.activate(30, Money::from_units(100), later).unwrap();

        assert_eq!(m.status, MembershipStatus::Active);
        assert_eq!(m.start_date, later);
        assert_eq!(m.end_date, later.add_days(30));
        assert_eq!(m.total_paid, Money::from_units(100));
    }

    #[test]
    fn activate_twice_fails() {
        let now = Timestamp::now();
        let mut m = active(now);
        let err = m.activate(30, Money::from_units(100), now).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn reset_to_pending_returns_wallet_contribution() {
        let now = Timestamp::now();
        let mut m = Membership::open_pending(new_membership(), &plan(), now);
        m.wallet_contribution = Money::from_units(20);
        m.total_paid = Money::from_units(20);

        let refund = m.reset_to_pending(now).unwrap();
        assert_eq!(refund, Money::from_units(20));
        assert_eq!(m.wallet_contribution, Money::ZERO);
        assert_eq!(m.total_paid, Money::ZERO);
        assert_eq!(m.status, MembershipStatus::PendingPayment);
    }

    #[test]
    fn reset_to_pending_rejects_active() {
        let mut m = active(Timestamp::now());
        assert!(m.reset_to_pending(Timestamp::now()).is_err());
    }

    // Freeze / resume tests

    #[test]
    fn resume_extends_end_by_freeze_duration() {
        let now = Timestamp::now();
        let mut m = active(now);
        let original_end = m.end_date;

        m.freeze(now, now).unwrap();
        assert_eq!(m.status, MembershipStatus::Frozen);

        let extended = m.resume(now.add_days(5)).unwrap();
        assert_eq!(extended, Duration::days(5));
        assert_eq!(m.end_date, original_end.add_days(5));
        assert!(m.freeze_start.is_none());
        assert_eq!(m.freeze_end, Some(now.add_days(5)));
    }

    #[test]
    fn resume_before_freeze_start_adds_nothing() {
        let now = Timestamp::now();
        let mut m = active(now);
        let original_end = m.end_date;

        m.freeze(now.add_days(10), now).unwrap();
        let extended = m.resume(now.add_days(2)).unwrap();

        assert_eq!(extended, Duration::zero());
        assert_eq!(m.end_date, original_end);
    }

    #[test]
    fn freeze_requires_active() {
        let now = Timestamp::now();
        let mut m = Membership::open_pending(new_membership(), &plan(), now);
        assert!(m.freeze(now, now).is_err());
    }

    #[test]
    fn resume_requires_frozen() {
        let mut m = active(Timestamp::now());
        assert!(m.resume(Timestamp::now()).is_err());
    }

    // Terminal transitions

    #[test]
    fn cancel_sets_cancelled_at() {
        let now = Timestamp::now();
        let mut m = active(now);
        m.cancel(now).unwrap();
        assert_eq!(m.status, MembershipStatus::Cancelled);
        assert_eq!(m.cancelled_at, Some(now));
        assert!(!m.is_open());
    }

    #[test]
    fn expired_cannot_be_cancelled() {
        let now = Timestamp::now();
        let mut m = active(now);
        m.expire(now).unwrap();
        assert!(m.cancel(now).is_err());
    }

    // Sweep predicates

    #[test]
    fn lapsed_and_expiring_windows() {
        let now = Timestamp::now();
        let mut m = active(now.minus_days(40));
        assert!(m.is_lapsed(now));
        assert!(!m.expires_within(now, 3));

        m.end_date = now.add_days(2);
        assert!(!m.is_lapsed(now));
        assert!(m.expires_within(now, 3));

        m.end_date = now.add_days(4);
        assert!(!m.expires_within(now, 3));
    }
}
