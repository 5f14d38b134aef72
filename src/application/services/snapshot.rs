use serde::Serialize;

use crate::domain::foundation::MembershipId;
use crate::domain::membership::{Membership, MembershipError};
use crate::domain::payment::Payment;
use crate::ports::UnitOfWork;

/// A membership together with its payment history, oldest payment first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipSnapshot {
    pub membership: Membership,
    pub payments: Vec<Payment>,
}

impl MembershipSnapshot {
    /// The most recent payment, if any.
    pub fn latest_payment(&self) -> Option<&Payment> {
        self.payments.last()
    }
}

/// Reads the snapshot inside `uow`, after its writes.
pub async fn load_snapshot(
    uow: &mut dyn UnitOfWork,
    membership_id: MembershipId,
) -> Result<MembershipSnapshot, MembershipError> {
    let membership = uow
        .memberships()
        .find_by_id(membership_id)
        .await?
        .ok_or_else(|| MembershipError::not_found(membership_id))?;
    let payments = uow.payments().list_for_membership(membership_id).await?;
    Ok(MembershipSnapshot {
        membership,
        payments,
    })
}
