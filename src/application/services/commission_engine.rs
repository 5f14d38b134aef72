//! Trainer commission generation.

use crate::domain::commission::{Commission, CommissionSource};
use crate::domain::foundation::{DomainError, Money, Timestamp};
use crate::domain::membership::{Membership, MembershipPlan};
use crate::domain::notification::{Notification, NotificationKind};
use crate::ports::UnitOfWork;

/// Creates the commission owed for `membership`, if any.
///
/// No-op when the member has no trainer or a commission for
/// `(membership, source)` already exists. Returns the trainer notification
/// to send after commit.
pub async fn generate_commission(
    uow: &mut dyn UnitOfWork,
    membership: &Membership,
    plan: &MembershipPlan,
    base_amount: Money,
    source: CommissionSource,
    now: Timestamp,
) -> Result<Option<Notification>, DomainError> {
    let Some(assignment) = uow
        .trainer_assignments()
        .current_for_member(membership.member_id)
        .await?
    else {
        return Ok(None);
    };

    if uow.commissions().exists(membership.id, source).await? {
        tracing::debug!(
            membership_id = %membership.id,
            source = %source,
            "Commission already recorded, skipping"
        );
        return Ok(None);
    }

    let commission = Commission::calculate(
        assignment.trainer_id,
        membership.id,
        membership.branch_id,
        source,
        plan.commission_rate,
        base_amount,
        now,
    );

    if !uow.commissions().insert_if_absent(&commission).await? {
        return Ok(None);
    }

    tracing::info!(
        trainer_id = %commission.trainer_id,
        membership_id = %membership.id,
        amount = %commission.amount,
        source = %source,
        "Commission recorded"
    );

    Ok(Some(Notification::new(
        commission.trainer_id,
        NotificationKind::CommissionEarned,
        "Commission earned",
        format!(
            "You earned {} ({}) on plan {}",
            commission.amount, source, plan.name
        ),
    )))
}
