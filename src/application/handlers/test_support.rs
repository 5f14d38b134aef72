//! Shared fixtures for handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::adapters::auth::RoleAccessPolicy;
use crate::adapters::memory::InMemoryStore;
use crate::adapters::notifications::InMemoryNotificationSink;
use crate::adapters::payment::ManualGateway;
use crate::application::services::{wallet_ledger, SideEffects};
use crate::domain::foundation::{
    BranchId, DomainError, MembershipId, Money, PlanId, Timestamp, UserId,
};
use crate::domain::invoice::Invoice;
use crate::domain::membership::plan::tests::details;
use crate::domain::membership::{
    Membership, MembershipPlan, MembershipSource, NewMembership, PlanDetails,
};
use crate::domain::notification::NotificationKind;
use crate::domain::people::{TrainerAssignment, UserAccount};
use crate::domain::wallet::{WalletTransaction, WalletTransactionType};
use crate::ports::{AccessPolicy, InvoiceRenderer, PaymentGateway, UnitOfWorkFactory};

/// Renderer that records what it was asked to render.
#[derive(Default)]
pub(crate) struct RecordingRenderer {
    pub rendered: Mutex<Vec<String>>,
}

#[async_trait]
impl InvoiceRenderer for RecordingRenderer {
    async fn render(&self, invoice: &Invoice) -> Result<String, DomainError> {
        self.rendered.lock().unwrap().push(invoice.number.clone());
        Ok(format!("/tmp/{}.txt", invoice.number))
    }
}

pub(crate) struct Harness {
    pub store: InMemoryStore,
    pub sink: Arc<InMemoryNotificationSink>,
    pub renderer: Arc<RecordingRenderer>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            store: InMemoryStore::new(),
            sink: Arc::new(InMemoryNotificationSink::new()),
            renderer: Arc::new(RecordingRenderer::default()),
        }
    }

    pub fn factory(&self) -> Arc<dyn UnitOfWorkFactory> {
        Arc::new(self.store.clone())
    }

    pub fn access(&self) -> Arc<dyn AccessPolicy> {
        Arc::new(RoleAccessPolicy::new())
    }

    pub fn gateway(&self) -> Arc<dyn PaymentGateway> {
        Arc::new(ManualGateway)
    }

    pub fn effects(&self) -> SideEffects {
        SideEffects::new(self.factory(), self.sink.clone(), self.renderer.clone())
    }

    pub fn notified(&self, kind: NotificationKind) -> usize {
        self.sink.sent().iter().filter(|n| n.kind == kind).count()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Seeding
    // ════════════════════════════════════════════════════════════════════════════

    pub async fn member(&self, branch: Option<BranchId>) -> UserId {
        let id = UserId::new();
        let account = UserAccount::new_member(id, "Mona", "mona@gym.test", branch, Timestamp::now());
        self.store
            .seed(|s| {
                s.users.insert(id, account);
            })
            .await;
        id
    }

    pub async fn trainer_for(&self, member: UserId) -> UserId {
        let id = UserId::new();
        let account = UserAccount::new_trainer(id, "Tarek", "tarek@gym.test", None);
        self.store
            .seed(|s| {
                s.users.insert(id, account);
                s.assignments.push(TrainerAssignment {
                    member_id: member,
                    trainer_id: id,
                    assigned_at: Timestamp::now(),
                });
            })
            .await;
        id
    }

    pub async fn plan(&self, name: &str, price_units: i64) -> MembershipPlan {
        self.plan_with(details(name, price_units)).await
    }

    pub async fn plan_with(&self, details: PlanDetails) -> MembershipPlan {
        let plan = MembershipPlan::create(PlanId::new(), details, Timestamp::now()).unwrap();
        let stored = plan.clone();
        self.store
            .seed(|s| {
                s.plans.insert(stored.id, stored);
            })
            .await;
        plan
    }

    pub async fn fund(&self, member: UserId, units: i64) {
        let mut uow = self.store.begin().await.unwrap();
        let credit = WalletTransaction::credit(
            member,
            Money::from_units(units),
            WalletTransactionType::Credit,
            None,
            "seed",
            member,
            Timestamp::now(),
        )
        .unwrap();
        wallet_ledger::append(uow.as_mut(), &credit).await.unwrap();
        uow.commit().await.unwrap();
    }

    /// Seeds an `Active` membership directly, without payments.
    pub async fn active_membership(
        &self,
        member: UserId,
        plan: &MembershipPlan,
        auto_renew: bool,
    ) -> Membership {
        let branch = self.account(member).await.branch_id;
        let membership = Membership::open_active(
            NewMembership {
                id: MembershipId::new(),
                member_id: member,
                branch_id: branch,
                source: MembershipSource::InGym,
                auto_renew,
            },
            plan,
            plan.effective_price(),
            Money::ZERO,
            Timestamp::now(),
        );
        self.save_membership(&membership).await;
        membership
    }

    pub async fn save_membership(&self, membership: &Membership) {
        let stored = membership.clone();
        self.store
            .seed(|s| {
                s.memberships.insert(stored.id, stored);
            })
            .await;
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Inspection
    // ════════════════════════════════════════════════════════════════════════════

    pub async fn account(&self, id: UserId) -> UserAccount {
        self.store.snapshot().await.users[&id].clone()
    }

    pub async fn membership(&self, id: MembershipId) -> Membership {
        self.store.snapshot().await.memberships[&id].clone()
    }

    pub async fn balance(&self, member: UserId) -> Money {
        let state = self.store.snapshot().await;
        let ledger = state.ledger_balance(member);
        assert_eq!(
            state.cached_balance(member).unwrap_or(Money::ZERO),
            ledger,
            "cached balance drifted from ledger"
        );
        ledger
    }
}
