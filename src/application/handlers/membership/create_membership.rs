//! CreateMembershipHandler - Command handler for opening a membership.
//!
//! The payment method decides the initial state:
//!
//! | Method | Membership | Payment | Ledger |
//! |--------|------------|---------|--------|
//! | Wallet | Active | Paid | debit of the effective price |
//! | Cash | Active | Confirmed | overpayment credited |
//! | Proof | PendingPayment | Pending | untouched |

use std::sync::Arc;

use crate::application::services::{
    load_snapshot, record_activation, wallet_ledger, MembershipSnapshot, PostCommit, SideEffects,
};
use crate::domain::foundation::{Actor, BranchScoped, MembershipId, Money, PlanId, Timestamp, UserId};
use crate::domain::membership::{
    Membership, MembershipError, MembershipSource, NewMembership,
};
use crate::domain::payment::{normalize_method, Payment, PaymentMethod};
use crate::domain::wallet::{WalletTransaction, WalletTransactionType};
use crate::ports::{AccessPolicy, PaymentGateway, UnitOfWorkFactory};

/// Command to open a membership for a member.
#[derive(Debug, Clone)]
pub struct CreateMembershipCommand {
    pub actor: Actor,
    pub member_id: UserId,
    pub plan_id: PlanId,
    pub source: MembershipSource,
    /// Falls back to the payment gateway's default for `source`.
    pub payment_method: Option<PaymentMethod>,
    /// Cash handed over or amount on the submitted proof.
    pub amount: Money,
    /// Any positive value pays the full price from the wallet.
    pub wallet_to_use: Money,
    pub auto_renew: bool,
    pub proof_url: Option<String>,
}

pub struct CreateMembershipHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    access: Arc<dyn AccessPolicy>,
    gateway: Arc<dyn PaymentGateway>,
    effects: SideEffects,
}

impl CreateMembershipHandler {
    pub fn new(
        uow_factory: Arc<dyn UnitOfWorkFactory>,
        access: Arc<dyn AccessPolicy>,
        gateway: Arc<dyn PaymentGateway>,
        effects: SideEffects,
    ) -> Self {
        Self {
            uow_factory,
            access,
            gateway,
            effects,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateMembershipCommand,
    ) -> Result<MembershipSnapshot, MembershipError> {
        // 1. Authorize: desk sales are admin-only, online sales are self-service
        if cmd.source.is_admin_path() {
            self.access.ensure_admin_full_access(&cmd.actor).await?;
        } else {
            self.access
                .ensure_member_owns_resource(&cmd.actor, cmd.member_id)
                .await?;
        }
        if cmd.amount.is_negative() {
            return Err(MembershipError::validation("amount", "must not be negative"));
        }
        if cmd.wallet_to_use.is_negative() {
            return Err(MembershipError::validation("wallet_to_use", "must not be negative"));
        }

        let now = Timestamp::now();
        let mut uow = self.uow_factory.begin().await?;

        // 2. Lock the member row; everything below is serialised per member
        let member = uow
            .members()
            .find_for_update(cmd.member_id)
            .await?
            .ok_or_else(|| MembershipError::member_not_found(cmd.member_id))?;
        if member.member_profile().is_none() {
            return Err(MembershipError::validation("member_id", "user is not a member"));
        }
        if !member.is_active {
            return Err(MembershipError::validation("member_id", "member account is inactive"));
        }
        member.check_branch(&cmd.actor)?;

        // 3. Load the plan
        let plan = uow
            .plans()
            .find_by_id(cmd.plan_id)
            .await?
            .filter(|p| !p.is_deleted)
            .ok_or_else(|| MembershipError::plan_not_found(cmd.plan_id))?;
        if !plan.is_active {
            return Err(MembershipError::validation("plan_id", "plan is not active"));
        }
        if !plan.is_available_in(member.branch_id) {
            return Err(MembershipError::branch_mismatch(
                "plan is not sold in the member's branch",
            ));
        }

        // 4. At most one open membership per member
        if !uow
            .memberships()
            .find_open_for_member(cmd.member_id)
            .await?
            .is_empty()
        {
            return Err(MembershipError::already_open(cmd.member_id));
        }

        // 5. Resolve how this membership is paid for
        let requested = cmd
            .payment_method
            .unwrap_or_else(|| self.gateway.classify(cmd.source).0);
        let method = normalize_method(requested, cmd.source, cmd.wallet_to_use)?;
        let price = plan.effective_price();
        let new = NewMembership {
            id: MembershipId::new(),
            member_id: cmd.member_id,
            branch_id: member.branch_id,
            source: cmd.source,
            auto_renew: cmd.auto_renew,
        };
        let mut work = PostCommit::new();

        // 6. Apply the method's bookkeeping
        let membership = match method {
            PaymentMethod::Wallet => {
                let membership = Membership::open_active(new, &plan, price, price, now);
                uow.memberships().insert(&membership).await?;
                if price.is_positive() {
                    let debit = WalletTransaction::debit(
                        cmd.member_id,
                        price,
                        WalletTransactionType::MembershipRenewal,
                        Some(*membership.id.as_uuid()),
                        format!("{} membership", plan.name),
                        cmd.actor.user_id,
                        now,
                    )?;
                    wallet_ledger::checked_debit(uow.as_mut(), &debit).await?;
                }
                let payment =
                    Payment::settled(membership.id, cmd.member_id, price, method, None, now);
                uow.payments().insert(&payment).await?;
                record_activation(uow.as_mut(), &membership, &plan, price, now, &mut work).await?;
                membership
            }
            PaymentMethod::Cash => {
                if cmd.amount < price {
                    return Err(MembershipError::validation(
                        "amount",
                        format!("cash amount {} is below the price {}", cmd.amount, price),
                    ));
                }
                let membership = Membership::open_active(new, &plan, cmd.amount, Money::ZERO, now);
                uow.memberships().insert(&membership).await?;
                let payment = Payment::settled(
                    membership.id,
                    cmd.member_id,
                    cmd.amount,
                    method,
                    Some(cmd.actor.user_id),
                    now,
                );
                uow.payments().insert(&payment).await?;

                let overpayment = cmd.amount - price;
                if overpayment.is_positive() {
                    let credit = WalletTransaction::credit(
                        cmd.member_id,
                        overpayment,
                        WalletTransactionType::Overpayment,
                        Some(*membership.id.as_uuid()),
                        format!("Overpayment on {} membership", plan.name),
                        cmd.actor.user_id,
                        now,
                    )?;
                    wallet_ledger::append(uow.as_mut(), &credit).await?;
                }
                record_activation(uow.as_mut(), &membership, &plan, cmd.amount, now, &mut work)
                    .await?;
                membership
            }
            PaymentMethod::Proof | PaymentMethod::VodafoneCash => {
                if !cmd.amount.is_positive() {
                    return Err(MembershipError::validation("amount", "must be positive"));
                }
                let membership = Membership::open_pending(new, &plan, now);
                uow.memberships().insert(&membership).await?;
                let payment = Payment::pending(
                    membership.id,
                    cmd.member_id,
                    cmd.amount,
                    PaymentMethod::Proof,
                    cmd.proof_url.clone(),
                    now,
                );
                uow.payments().insert(&payment).await?;
                membership
            }
        };

        // 7. Commit, then run side effects
        let snapshot = load_snapshot(uow.as_mut(), membership.id).await?;
        uow.commit().await?;

        tracing::info!(
            membership_id = %membership.id,
            member_id = %cmd.member_id,
            plan = %plan.name,
            method = %method.as_str(),
            status = %membership.status,
            "Membership created"
        );
        self.effects.dispatch(work).await;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Harness;
    use crate::domain::commission::CommissionSource;
    use crate::domain::foundation::{BranchId, ErrorCode, Percentage};
    use crate::domain::membership::plan::tests::details;
    use crate::domain::membership::MembershipStatus;
    use crate::domain::notification::NotificationKind;
    use crate::domain::payment::PaymentStatus;
    use rust_decimal::Decimal;

    fn handler(h: &Harness) -> CreateMembershipHandler {
        CreateMembershipHandler::new(h.factory(), h.access(), h.gateway(), h.effects())
    }

    fn desk(member: UserId, plan: PlanId, amount: i64) -> CreateMembershipCommand {
        CreateMembershipCommand {
            actor: Actor::platform_admin(UserId::new()),
            member_id: member,
            plan_id: plan,
            source: MembershipSource::InGym,
            payment_method: Some(PaymentMethod::Cash),
            amount: Money::from_units(amount),
            wallet_to_use: Money::ZERO,
            auto_renew: false,
            proof_url: None,
        }
    }

    fn online(member: UserId, plan: PlanId, amount: i64) -> CreateMembershipCommand {
        CreateMembershipCommand {
            actor: Actor::member(member, None),
            member_id: member,
            plan_id: plan,
            source: MembershipSource::Online,
            payment_method: None,
            amount: Money::from_units(amount),
            wallet_to_use: Money::ZERO,
            auto_renew: false,
            proof_url: Some("https://proofs.gym.test/1.jpg".to_string()),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Wallet path
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn wallet_payment_debits_discounted_price() {
        let h = Harness::new();
        let member = h.member(None).await;
        h.fund(member, 200).await;
        let mut d = details("Gold", 100);
        d.session_discount = Percentage::try_new(Decimal::from(15)).unwrap();
        let plan = h.plan_with(d).await;

        let mut cmd = online(member, plan.id, 0);
        cmd.wallet_to_use = Money::from_units(1);
        let snap = handler(&h).handle(cmd).await.unwrap();

        assert_eq!(snap.membership.status, MembershipStatus::Active);
        assert_eq!(snap.membership.total_paid, Money::from_units(85));
        assert_eq!(snap.membership.wallet_contribution, Money::from_units(85));
        assert_eq!(snap.payments.len(), 1);
        assert_eq!(snap.payments[0].status, PaymentStatus::Paid);
        assert_eq!(snap.payments[0].method, PaymentMethod::Wallet);
        assert_eq!(h.balance(member).await, Money::from_units(115));
        assert_eq!(h.store.snapshot().await.invoices.len(), 1);
        assert_eq!(h.notified(NotificationKind::MembershipActivated), 1);
    }

    #[tokio::test]
    async fn wallet_payment_requires_full_balance() {
        let h = Harness::new();
        let member = h.member(None).await;
        h.fund(member, 50).await;
        let plan = h.plan("Gold", 100).await;

        let mut cmd = online(member, plan.id, 0);
        cmd.wallet_to_use = Money::from_units(50);
        let err = handler(&h).handle(cmd).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::InsufficientFunds);
        let state = h.store.snapshot().await;
        assert!(state.memberships.is_empty());
        assert_eq!(h.balance(member).await, Money::from_units(50));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Cash path
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn cash_overpayment_is_credited_and_commission_recorded() {
        let h = Harness::new();
        let member = h.member(None).await;
        let trainer = h.trainer_for(member).await;
        let plan = h.plan("Gold", 100).await;

        let snap = handler(&h).handle(desk(member, plan.id, 120)).await.unwrap();

        assert_eq!(snap.membership.status, MembershipStatus::Active);
        assert_eq!(snap.membership.total_paid, Money::from_units(120));
        assert_eq!(snap.payments[0].status, PaymentStatus::Confirmed);
        assert!(snap.payments[0].reviewed_by.is_some());
        assert_eq!(h.balance(member).await, Money::from_units(20));

        let state = h.store.snapshot().await;
        assert_eq!(state.commissions.len(), 1);
        assert_eq!(state.commissions[0].trainer_id, trainer);
        assert_eq!(state.commissions[0].source, CommissionSource::Activation);
        assert_eq!(state.commissions[0].amount, Money::from_units(10));
        assert_eq!(h.notified(NotificationKind::CommissionEarned), 1);
    }

    #[tokio::test]
    async fn cash_below_price_is_rejected() {
        let h = Harness::new();
        let member = h.member(None).await;
        let plan = h.plan("Gold", 100).await;

        let err = handler(&h).handle(desk(member, plan.id, 99)).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert!(h.store.snapshot().await.memberships.is_empty());
    }

    #[tokio::test]
    async fn desk_sale_requires_admin() {
        let h = Harness::new();
        let member = h.member(None).await;
        let plan = h.plan("Gold", 100).await;

        let mut cmd = desk(member, plan.id, 100);
        cmd.actor = Actor::member(member, None);
        let err = handler(&h).handle(cmd).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Proof path
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn online_default_is_pending_proof() {
        let h = Harness::new();
        let member = h.member(None).await;
        let plan = h.plan("Gold", 100).await;

        let snap = handler(&h).handle(online(member, plan.id, 100)).await.unwrap();

        assert_eq!(snap.membership.status, MembershipStatus::PendingPayment);
        assert_eq!(snap.membership.total_paid, Money::ZERO);
        assert_eq!(snap.payments[0].status, PaymentStatus::Pending);
        assert_eq!(snap.payments[0].method, PaymentMethod::Proof);
        let state = h.store.snapshot().await;
        assert!(state.wallet.is_empty());
        assert!(state.invoices.is_empty());
        assert!(h.sink.sent().is_empty());
    }

    #[tokio::test]
    async fn online_cash_is_rejected() {
        let h = Harness::new();
        let member = h.member(None).await;
        let plan = h.plan("Gold", 100).await;

        let mut cmd = online(member, plan.id, 100);
        cmd.payment_method = Some(PaymentMethod::Cash);
        let err = handler(&h).handle(cmd).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidFormat);
    }

    #[tokio::test]
    async fn proof_requires_positive_amount() {
        let h = Harness::new();
        let member = h.member(None).await;
        let plan = h.plan("Gold", 100).await;

        let err = handler(&h).handle(online(member, plan.id, 0)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Preconditions
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn second_open_membership_is_rejected() {
        let h = Harness::new();
        let member = h.member(None).await;
        let plan = h.plan("Gold", 100).await;
        handler(&h).handle(online(member, plan.id, 100)).await.unwrap();

        let err = handler(&h).handle(desk(member, plan.id, 100)).await.unwrap_err();
        assert_eq!(err, MembershipError::already_open(member));
        assert_eq!(h.store.snapshot().await.memberships.len(), 1);
    }

    #[tokio::test]
    async fn deleted_plan_is_not_found_and_inactive_plan_is_invalid() {
        let h = Harness::new();
        let member = h.member(None).await;
        let mut inactive = details("Dormant", 100);
        inactive.is_active = false;
        let inactive = h.plan_with(inactive).await;

        let err = handler(&h).handle(desk(member, inactive.id, 100)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);

        let mut gone = h.plan("Gone", 100).await;
        gone.soft_delete(Timestamp::now());
        let stored = gone.clone();
        h.store.seed(|s| { s.plans.insert(stored.id, stored); }).await;
        let err = handler(&h).handle(desk(member, gone.id, 100)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::PlanNotFound);
    }

    #[tokio::test]
    async fn branch_plan_cannot_be_sold_elsewhere() {
        let h = Harness::new();
        let member = h.member(Some(BranchId::new())).await;
        let mut d = details("Downtown only", 100);
        d.branch_id = Some(BranchId::new());
        let plan = h.plan_with(d).await;

        let err = handler(&h).handle(desk(member, plan.id, 100)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::BranchMismatch);
    }

    #[tokio::test]
    async fn branch_admin_cannot_sell_to_other_branch_member() {
        let h = Harness::new();
        let member = h.member(Some(BranchId::new())).await;
        let plan = h.plan("Gold", 100).await;

        let mut cmd = desk(member, plan.id, 100);
        cmd.actor = Actor::branch_admin(UserId::new(), BranchId::new());
        let err = handler(&h).handle(cmd).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
