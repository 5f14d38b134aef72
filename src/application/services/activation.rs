use crate::domain::commission::CommissionSource;
use crate::domain::foundation::{Money, Timestamp};
use crate::domain::invoice::{Invoice, InvoiceKind};
use crate::domain::membership::{Membership, MembershipError, MembershipPlan};
use crate::domain::notification::{Notification, NotificationKind};
use crate::ports::UnitOfWork;

use super::commission_engine::generate_commission;
use super::side_effects::PostCommit;

/// Bookkeeping shared by every path that turns a membership `Active`
/// through a paid activation: the activation commission on the effective
/// price, a `MembershipPayment` invoice for what was paid, and the member
/// notification.
pub async fn record_activation(
    uow: &mut dyn UnitOfWork,
    membership: &Membership,
    plan: &MembershipPlan,
    amount_paid: Money,
    now: Timestamp,
    work: &mut PostCommit,
) -> Result<(), MembershipError> {
    let trainer_note = generate_commission(
        uow,
        membership,
        plan,
        plan.effective_price(),
        CommissionSource::Activation,
        now,
    )
    .await?;
    work.notify_opt(trainer_note);

    let invoice = Invoice::issue(
        membership.member_id,
        Some(membership.id),
        membership.branch_id,
        InvoiceKind::MembershipPayment,
        amount_paid,
        format!("{} membership ({} days)", plan.name, plan.duration_days),
        now,
    );
    uow.invoices().insert(&invoice).await?;
    work.render(invoice);

    work.notify(Notification::new(
        membership.member_id,
        NotificationKind::MembershipActivated,
        "Membership active",
        format!(
            "Your {} membership is active until {}",
            plan.name,
            membership.end_date.as_datetime().format("%Y-%m-%d")
        ),
    ));
    Ok(())
}
