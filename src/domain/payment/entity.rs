//! Payment entity.
//!
//! A membership accumulates one payment per settlement attempt. Rejected
//! payments stay on record; the next attempt is a new row.

use crate::domain::foundation::{
    DomainError, ErrorCode, MembershipId, Money, PaymentId, StateMachine, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

use super::{PaymentMethod, PaymentStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub membership_id: MembershipId,
    pub member_id: UserId,
    pub amount: Money,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub proof_url: Option<String>,
    pub paid_at: Option<Timestamp>,
    pub reviewed_at: Option<Timestamp>,
    /// Admin who confirmed or rejected the payment.
    pub reviewed_by: Option<UserId>,
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
}

impl Payment {
    /// A payment awaiting admin review.
    pub fn pending(
        membership_id: MembershipId,
        member_id: UserId,
        amount: Money,
        method: PaymentMethod,
        proof_url: Option<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: PaymentId::new(),
            membership_id,
            member_id,
            amount,
            method,
            status: PaymentStatus::Pending,
            proof_url,
            paid_at: None,
            reviewed_at: None,
            reviewed_by: None,
            rejection_reason: None,
            created_at: now,
        }
    }

    /// A settled payment, e.g. a wallet debit or desk cash.
    ///
    /// `reviewed_by` is set when an admin took the money in person, which
    /// records the payment as `Confirmed` rather than `Paid`.
    pub fn settled(
        membership_id: MembershipId,
        member_id: UserId,
        amount: Money,
        method: PaymentMethod,
        reviewed_by: Option<UserId>,
        now: Timestamp,
    ) -> Self {
        let status = if reviewed_by.is_some() {
            PaymentStatus::Confirmed
        } else {
            PaymentStatus::Paid
        };
        Self {
            id: PaymentId::new(),
            membership_id,
            member_id,
            amount,
            method,
            status,
            proof_url: None,
            paid_at: Some(now),
            reviewed_at: reviewed_by.map(|_| now),
            reviewed_by,
            rejection_reason: None,
            created_at: now,
        }
    }

    pub fn confirm(&mut self, admin: UserId, now: Timestamp) -> Result<(), DomainError> {
        self.transition_to(PaymentStatus::Confirmed)?;
        self.paid_at = Some(now);
        self.reviewed_at = Some(now);
        self.reviewed_by = Some(admin);
        Ok(())
    }

    pub fn reject(
        &mut self,
        admin: UserId,
        reason: impl Into<String>,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        self.transition_to(PaymentStatus::Rejected)?;
        self.reviewed_at = Some(now);
        self.reviewed_by = Some(admin);
        self.rejection_reason = Some(reason.into());
        Ok(())
    }

    fn transition_to(&mut self, target: PaymentStatus) -> Result<(), DomainError> {
        let current = self.status;
        self.status = current.transition_to(target).map_err(|e| {
            DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
                .with_detail("current", current.as_str())
                .with_detail("attempted", target.as_str())
        })?;
        Ok(())
    }
}
