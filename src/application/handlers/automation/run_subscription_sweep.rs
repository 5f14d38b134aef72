//! RunSubscriptionSweepHandler - Expiry reminders, expiry and auto-renewal.
//!
//! ## Phases
//!
//! 1. Active memberships ending within the warning window get a reminder.
//! 2. Lapsed active memberships are expired, each in its own unit of work.
//!    Auto-renewing ones are renewed from the wallet when possible.
//!
//! Every lapsed membership is re-read under its member's lock and then its
//! own, and skipped unless it is still `Active`, so running the sweep twice
//! over the same data expires and renews nothing the second time.

use std::sync::Arc;

use serde::Serialize;

use crate::application::services::{
    generate_commission, lock_membership, wallet_ledger, PostCommit, SideEffects,
};
use crate::domain::commission::CommissionSource;
use crate::domain::foundation::{MembershipId, Timestamp, UserId};
use crate::domain::invoice::{Invoice, InvoiceKind};
use crate::domain::membership::{Membership, MembershipError, NewMembership};
use crate::domain::notification::{Notification, NotificationKind};
use crate::domain::payment::{Payment, PaymentMethod};
use crate::domain::wallet::{WalletTransaction, WalletTransactionType};
use crate::ports::{UnitOfWork, UnitOfWorkFactory};

#[derive(Debug, Clone, Copy)]
pub struct RunSubscriptionSweepCommand {
    pub now: Timestamp,
}

/// Counters for one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub reminders: u32,
    pub expired: u32,
    pub auto_renewed: u32,
    pub skipped: u32,
    pub failed: u32,
}

/// What happened to one lapsed membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LapseOutcome {
    /// Handled by an earlier or concurrent sweep.
    AlreadyHandled,
    Expired,
    Renewed,
    RenewalSkipped,
}

pub struct RunSubscriptionSweepHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    effects: SideEffects,
    warning_days: u32,
}

impl RunSubscriptionSweepHandler {
    pub fn new(
        uow_factory: Arc<dyn UnitOfWorkFactory>,
        effects: SideEffects,
        warning_days: u32,
    ) -> Self {
        Self {
            uow_factory,
            effects,
            warning_days,
        }
    }

    pub async fn handle(
        &self,
        cmd: RunSubscriptionSweepCommand,
    ) -> Result<SweepReport, MembershipError> {
        let now = cmd.now;
        let mut report = SweepReport {
            reminders: self.send_reminders(now).await?,
            ..SweepReport::default()
        };

        let lapsed: Vec<MembershipId> = {
            let mut uow = self.uow_factory.begin().await?;
            uow.memberships()
                .find_lapsed(now)
                .await?
                .into_iter()
                .map(|m| m.id)
                .collect()
        };

        for id in lapsed {
            match self.process_lapsed(id, now).await {
                Ok(LapseOutcome::AlreadyHandled) => {}
                Ok(LapseOutcome::Expired) => report.expired += 1,
                Ok(LapseOutcome::Renewed) => {
                    report.expired += 1;
                    report.auto_renewed += 1;
                }
                Ok(LapseOutcome::RenewalSkipped) => {
                    report.expired += 1;
                    report.skipped += 1;
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(membership_id = %id, error = %e, "Failed to process lapsed membership");
                }
            }
        }

        tracing::info!(
            reminders = report.reminders,
            expired = report.expired,
            auto_renewed = report.auto_renewed,
            skipped = report.skipped,
            failed = report.failed,
            "Subscription sweep finished"
        );
        Ok(report)
    }

    async fn send_reminders(&self, now: Timestamp) -> Result<u32, MembershipError> {
        let ending = {
            let mut uow = self.uow_factory.begin().await?;
            uow.memberships()
                .find_active_ending_between(now, now.add_days(i64::from(self.warning_days)))
                .await?
        };

        let mut work = PostCommit::new();
        for membership in &ending {
            work.notify(Notification::new(
                membership.member_id,
                NotificationKind::ExpiryReminder,
                "Membership ending soon",
                format!(
                    "Your membership ends on {}",
                    membership.end_date.as_datetime().format("%Y-%m-%d")
                ),
            ));
        }
        self.effects.dispatch(work).await;
        Ok(u32::try_from(ending.len()).unwrap_or(u32::MAX))
    }

    async fn process_lapsed(
        &self,
        id: MembershipId,
        now: Timestamp,
    ) -> Result<LapseOutcome, MembershipError> {
        let mut uow = self.uow_factory.begin().await?;
        let Some(mut membership) = lock_membership(uow.as_mut(), id).await? else {
            return Ok(LapseOutcome::AlreadyHandled);
        };
        if !membership.is_lapsed(now) {
            return Ok(LapseOutcome::AlreadyHandled);
        }

        membership.expire(now)?;
        uow.memberships().update(&membership).await?;

        let mut work = PostCommit::new();
        let outcome = if !membership.auto_renew {
            work.notify(Notification::new(
                membership.member_id,
                NotificationKind::MembershipExpired,
                "Membership expired",
                "Your membership has expired",
            ));
            LapseOutcome::Expired
        } else {
            match renew(uow.as_mut(), &membership, now, &mut work).await? {
                Renewal::Renewed(renewed) => {
                    tracing::info!(
                        member_id = %membership.member_id,
                        from = %membership.id,
                        to = %renewed,
                        "Membership auto-renewed"
                    );
                    LapseOutcome::Renewed
                }
                Renewal::Skipped(reason) => {
                    tracing::info!(
                        member_id = %membership.member_id,
                        membership_id = %membership.id,
                        reason,
                        "Auto-renewal skipped"
                    );
                    work.notify(Notification::new(
                        membership.member_id,
                        NotificationKind::AutoRenewSkipped,
                        "Auto-renewal skipped",
                        format!("Your membership expired and was not renewed: {}", reason),
                    ));
                    LapseOutcome::RenewalSkipped
                }
            }
        };

        uow.commit().await?;
        self.effects.dispatch(work).await;
        Ok(outcome)
    }
}

enum Renewal {
    Renewed(MembershipId),
    Skipped(&'static str),
}

/// Opens the follow-up period for an expired auto-renewing membership.
async fn renew(
    uow: &mut dyn UnitOfWork,
    expired: &Membership,
    now: Timestamp,
    work: &mut PostCommit,
) -> Result<Renewal, MembershipError> {
    let member_id: UserId = expired.member_id;
    if uow.members().find_for_update(member_id).await?.is_none() {
        return Ok(Renewal::Skipped("member account no longer exists"));
    }

    let plan = match uow.plans().find_by_id(expired.plan_id).await? {
        Some(plan) if plan.is_purchasable() => plan,
        _ => return Ok(Renewal::Skipped("plan is no longer available")),
    };
    if !uow.memberships().find_open_for_member(member_id).await?.is_empty() {
        return Ok(Renewal::Skipped("another membership is already open"));
    }
    let price = plan.price;
    if uow.wallet().balance(member_id).await? < price {
        return Ok(Renewal::Skipped("insufficient wallet balance"));
    }

    let renewed = Membership::open_active(
        NewMembership {
            id: MembershipId::new(),
            member_id,
            branch_id: expired.branch_id,
            source: expired.source,
            auto_renew: true,
        },
        &plan,
        price,
        price,
        now,
    );
    uow.memberships().insert(&renewed).await?;

    if price.is_positive() {
        let payment = Payment::settled(renewed.id, member_id, price, PaymentMethod::Wallet, None, now);
        uow.payments().insert(&payment).await?;

        let debit = WalletTransaction::debit(
            member_id,
            price,
            WalletTransactionType::MembershipRenewal,
            Some(*renewed.id.as_uuid()),
            format!("Auto-renewal of {} membership", plan.name),
            member_id,
            now,
        )?;
        wallet_ledger::checked_debit(uow, &debit).await?;
    }

    let trainer_note =
        generate_commission(uow, &renewed, &plan, price, CommissionSource::Renewal, now).await?;
    work.notify_opt(trainer_note);

    let invoice = Invoice::issue(
        member_id,
        Some(renewed.id),
        renewed.branch_id,
        InvoiceKind::AutoRenewal,
        price,
        format!("{} membership auto-renewal ({} days)", plan.name, plan.duration_days),
        now,
    );
    uow.invoices().insert(&invoice).await?;
    work.render(invoice);

    work.notify(Notification::new(
        member_id,
        NotificationKind::AutoRenewed,
        "Membership renewed",
        format!(
            "Your {} membership was renewed until {}",
            plan.name,
            renewed.end_date.as_datetime().format("%Y-%m-%d")
        ),
    ));
    Ok(Renewal::Renewed(renewed.id))
}
