//! ReviewPaymentHandler - Single entry point for the admin review queue.

use std::sync::Arc;

use crate::application::services::MembershipSnapshot;
use crate::domain::foundation::{Actor, MembershipId};
use crate::domain::membership::MembershipError;

use super::{ConfirmPaymentCommand, ConfirmPaymentHandler, RejectPaymentCommand, RejectPaymentHandler};

#[derive(Debug, Clone)]
pub struct ReviewPaymentCommand {
    pub actor: Actor,
    pub membership_id: MembershipId,
    pub approve: bool,
    /// Required when rejecting.
    pub reason: Option<String>,
}

/// Dispatches to confirm or reject.
pub struct ReviewPaymentHandler {
    confirm: Arc<ConfirmPaymentHandler>,
    reject: Arc<RejectPaymentHandler>,
}

impl ReviewPaymentHandler {
    pub fn new(confirm: Arc<ConfirmPaymentHandler>, reject: Arc<RejectPaymentHandler>) -> Self {
        Self { confirm, reject }
    }

    pub async fn handle(
        &self,
        cmd: ReviewPaymentCommand,
    ) -> Result<MembershipSnapshot, MembershipError> {
        if cmd.approve {
            self.confirm
                .handle(ConfirmPaymentCommand {
                    actor: cmd.actor,
                    membership_id: cmd.membership_id,
                })
                .await
        } else {
            self.reject
                .handle(RejectPaymentCommand {
                    actor: cmd.actor,
                    membership_id: cmd.membership_id,
                    reason: cmd.reason.unwrap_or_default(),
                })
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::membership::{CreateMembershipCommand, CreateMembershipHandler};
    use crate::application::handlers::test_support::Harness;
    use crate::domain::foundation::{ErrorCode, Money, UserId};
    use crate::domain::membership::{MembershipSource, MembershipStatus};

    fn handler(h: &Harness) -> ReviewPaymentHandler {
        ReviewPaymentHandler::new(
            Arc::new(ConfirmPaymentHandler::new(h.factory(), h.access(), h.effects())),
            Arc::new(RejectPaymentHandler::new(h.factory(), h.access(), h.effects())),
        )
    }

    async fn pending(h: &Harness) -> MembershipId {
        let member = h.member(None).await;
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

    #[tokio::test]
    async fn approve_activates() {
        let h = Harness::new();
        let id = pending(&h).await;
        let snap = handler(&h)
            .handle(ReviewPaymentCommand {
                actor: Actor::platform_admin(UserId::new()),
                membership_id: id,
                approve: true,
                reason: None,
            })
            .await
            .unwrap();
        assert_eq!(snap.membership.status, MembershipStatus::Active);
    }

    #[tokio::test]
    async fn reject_without_reason_fails() {
        let h = Harness::new();
        let id = pending(&h).await;
        let err = handler(&h)
            .handle(ReviewPaymentCommand {
                actor: Actor::platform_admin(UserId::new()),
                membership_id: id,
                approve: false,
                reason: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }
}
