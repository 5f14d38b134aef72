//! SubmitPaymentProofHandler - Starts a new review cycle after a rejection.

use std::sync::Arc;

use crate::application::services::{load_snapshot, lock_membership, MembershipSnapshot};
use crate::domain::foundation::{Actor, BranchScoped, MembershipId, Money, Timestamp};
use crate::domain::membership::{MembershipError, MembershipStatus};
use crate::domain::payment::{Payment, PaymentMethod};
use crate::ports::{AccessPolicy, UnitOfWorkFactory};

#[derive(Debug, Clone)]
pub struct SubmitPaymentProofCommand {
    pub actor: Actor,
    pub membership_id: MembershipId,
    pub amount: Money,
    pub proof_url: Option<String>,
}

pub struct SubmitPaymentProofHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    access: Arc<dyn AccessPolicy>,
}

impl SubmitPaymentProofHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, access: Arc<dyn AccessPolicy>) -> Self {
        Self {
            uow_factory,
            access,
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitPaymentProofCommand,
    ) -> Result<MembershipSnapshot, MembershipError> {
        if !cmd.amount.is_positive() {
            return Err(MembershipError::validation("amount", "must be positive"));
        }

        let now = Timestamp::now();
        let mut uow = self.uow_factory.begin().await?;

        let membership = lock_membership(uow.as_mut(), cmd.membership_id)
            .await?
            .ok_or_else(|| MembershipError::not_found(cmd.membership_id))?;
        self.access
            .ensure_member_owns_resource(&cmd.actor, membership.member_id)
            .await?;
        membership.check_branch(&cmd.actor)?;

        if membership.status != MembershipStatus::PendingPayment {
            return Err(MembershipError::invalid_state(
                membership.status.as_str(),
                "submit payment proof for",
            ));
        }
        if uow
            .payments()
            .find_latest_pending(membership.id)
            .await?
            .is_some()
        {
            return Err(MembershipError::validation(
                "membership_id",
                "a payment is already awaiting review",
            ));
        }

        let payment = Payment::pending(
            membership.id,
            membership.member_id,
            cmd.amount,
            PaymentMethod::Proof,
            cmd.proof_url,
            now,
        );
        uow.payments().insert(&payment).await?;

        let snapshot = load_snapshot(uow.as_mut(), membership.id).await?;
        uow.commit().await?;

        tracing::info!(
            membership_id = %membership.id,
            payment_id = %payment.id,
            "Payment proof submitted"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::membership::{
        CreateMembershipCommand, CreateMembershipHandler, RejectPaymentCommand,
        RejectPaymentHandler,
    };
    use crate::application::handlers::test_support::Harness;
    use crate::domain::foundation::{ErrorCode, UserId};
    use crate::domain::membership::MembershipSource;
    use crate::domain::payment::PaymentStatus;

    async fn pending(h: &Harness, member: UserId) -> MembershipId {
        let plan = h.plan("Gold", 100).await;
        CreateMembershipHandler::new(h.factory(), h.access(), h.gateway(), h.effects())
            .handle(CreateMembershipCommand {
                actor: Actor::member(member, None),
                member_id: member,
                plan_id: plan.id,
                source: MembershipSource::Online,
                payment_method: None,
                amount: Money::from_units(100),
                wallet_to_use: Money::ZERO,
                auto_renew: false,
                proof_url: None,
            })
            .await
            .unwrap()
            .membership
            .id
    }

    fn submit(member: UserId, id: MembershipId) -> SubmitPaymentProofCommand {
        SubmitPaymentProofCommand {
            actor: Actor::member(member, None),
            membership_id: id,
            amount: Money::from_units(100),
            proof_url: Some("https://proofs.gym.test/2.jpg".to_string()),
        }
    }

    #[tokio::test]
    async fn resubmission_after_rejection_opens_new_cycle() {
        let h = Harness::new();
        let member = h.member(None).await;
        let id = pending(&h, member).await;
        RejectPaymentHandler::new(h.factory(), h.access(), h.effects())
            .handle(RejectPaymentCommand {
                actor: Actor::platform_admin(UserId::new()),
                membership_id: id,
                reason: "unreadable".to_string(),
            })
            .await
            .unwrap();

        let snap = SubmitPaymentProofHandler::new(h.factory(), h.access())
            .handle(submit(member, id))
            .await
            .unwrap();

        assert_eq!(snap.payments.len(), 2);
        assert_eq!(snap.payments[0].status, PaymentStatus::Rejected);
        assert_eq!(snap.payments[1].status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn cannot_submit_while_review_pending() {
        let h = Harness::new();
        let member = h.member(None).await;
        let id = pending(&h, member).await;

        let err = SubmitPaymentProofHandler::new(h.factory(), h.access())
            .handle(submit(member, id))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn other_member_is_forbidden() {
        let h = Harness::new();
        let member = h.member(None).await;
        let id = pending(&h, member).await;

        let err = SubmitPaymentProofHandler::new(h.factory(), h.access())
            .handle(submit(UserId::new(), id))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
