//! In-memory relational store with transactional units of work.
//!
//! A unit of work takes an owned lock on the whole store and mutates a
//! private working copy; commit publishes the copy, drop discards it. Units
//! of work are therefore fully serialised, which gives the same guarantees
//! as the row locks and unique indexes of the PostgreSQL adapter.
//!
//! Used by tests and local development. Not intended for production.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::commission::{Commission, CommissionSource};
use crate::domain::foundation::{
    CommissionId, DomainError, ErrorCode, InvoiceId, MembershipId, Money, PlanId, Timestamp,
    UserId,
};
use crate::domain::invoice::Invoice;
use crate::domain::membership::{Membership, MembershipPlan, MembershipStatus};
use crate::domain::payment::{Payment, PaymentStatus};
use crate::domain::people::{TrainerAssignment, UserAccount};
use crate::domain::wallet::{balance_of, WalletTransaction};
use crate::ports::{
    CommissionRepository, InvoiceRepository, MembershipRepository, PaymentRepository,
    PlanRepository, TrainerAssignmentRepository, UnitOfWork, UnitOfWorkFactory, UserRepository,
    WalletRepository,
};

/// Every table of the store. Vectors keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub users: HashMap<UserId, UserAccount>,
    pub assignments: Vec<TrainerAssignment>,
    pub plans: HashMap<PlanId, MembershipPlan>,
    pub memberships: HashMap<MembershipId, Membership>,
    pub payments: Vec<Payment>,
    pub wallet: Vec<WalletTransaction>,
    pub commissions: Vec<Commission>,
    pub invoices: Vec<Invoice>,
}

impl MemoryState {
    pub fn ledger_balance(&self, member_id: UserId) -> Money {
        balance_of(self.wallet.iter().filter(|t| t.member_id == member_id))
    }

    pub fn cached_balance(&self, member_id: UserId) -> Option<Money> {
        self.users
            .get(&member_id)
            .and_then(|u| u.member_profile())
            .map(|p| p.wallet_balance)
    }

    pub fn memberships_of(&self, member_id: UserId) -> Vec<&Membership> {
        self.memberships
            .values()
            .filter(|m| m.member_id == member_id)
            .collect()
    }

    fn check_single_open(&self, membership: &Membership) -> Result<(), DomainError> {
        if !membership.is_open() {
            return Ok(());
        }
        let conflict = self.memberships.values().any(|m| {
            m.id != membership.id && m.member_id == membership.member_id && m.is_open()
        });
        if conflict {
            return Err(DomainError::new(
                ErrorCode::MembershipAlreadyOpen,
                "Member already has an open membership",
            )
            .with_detail("field", "member_id")
            .with_detail("member_id", membership.member_id.to_string()));
        }
        Ok(())
    }

    fn check_plan_name(&self, plan: &MembershipPlan) -> Result<(), DomainError> {
        if plan.is_deleted {
            return Ok(());
        }
        let key = MembershipPlan::name_key(&plan.name);
        let conflict = self.plans.values().any(|p| {
            p.id != plan.id && !p.is_deleted && MembershipPlan::name_key(&p.name) == key
        });
        if conflict {
            return Err(DomainError::new(
                ErrorCode::DuplicatePlanName,
                format!("A plan named '{}' already exists", plan.name),
            )
            .with_detail("field", "name"));
        }
        Ok(())
    }
}

/// Shared in-memory store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Copy of the committed state.
    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }

    /// Mutates committed state directly, bypassing units of work.
    pub async fn seed<F>(&self, f: F)
    where
        F: FnOnce(&mut MemoryState),
    {
        let mut state = self.state.lock().await;
        f(&mut state);
    }
}

#[async_trait]
impl UnitOfWorkFactory for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, DomainError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemoryUnitOfWork { guard, working }))
    }
}

/// A serialised transaction over [`InMemoryStore`].
pub struct InMemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

fn newest_first<T: Clone>(rows: impl Iterator<Item = T>, at: impl Fn(&T) -> Timestamp) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.reverse();
    rows.sort_by_key(|r| std::cmp::Reverse(at(r)));
    rows
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn members(&mut self) -> &mut dyn UserRepository {
        self
    }

    fn trainer_assignments(&mut self) -> &mut dyn TrainerAssignmentRepository {
        self
    }

    fn plans(&mut self) -> &mut dyn PlanRepository {
        self
    }

    fn memberships(&mut self) -> &mut dyn MembershipRepository {
        self
    }

    fn payments(&mut self) -> &mut dyn PaymentRepository {
        self
    }

    fn wallet(&mut self) -> &mut dyn WalletRepository {
        self
    }

    fn commissions(&mut self) -> &mut dyn CommissionRepository {
        self
    }

    fn invoices(&mut self) -> &mut dyn InvoiceRepository {
        self
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let InMemoryUnitOfWork { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUnitOfWork {
    async fn find_by_id(&mut self, id: UserId) -> Result<Option<UserAccount>, DomainError> {
        Ok(self.working.users.get(&id).cloned())
    }

    async fn find_for_update(&mut self, id: UserId) -> Result<Option<UserAccount>, DomainError> {
        Ok(self.working.users.get(&id).cloned())
    }

    async fn save(&mut self, account: &UserAccount) -> Result<(), DomainError> {
        self.working.users.insert(account.id, account.clone());
        Ok(())
    }

    async fn update_wallet_balance(
        &mut self,
        id: UserId,
        balance: Money,
    ) -> Result<(), DomainError> {
        let account = self.working.users.get_mut(&id).ok_or_else(|| {
            DomainError::new(ErrorCode::MemberNotFound, "Member not found")
                .with_detail("id", id.to_string())
        })?;
        account.sync_wallet_balance(balance);
        Ok(())
    }
}

#[async_trait]
impl TrainerAssignmentRepository for InMemoryUnitOfWork {
    async fn current_for_member(
        &mut self,
        member_id: UserId,
    ) -> Result<Option<TrainerAssignment>, DomainError> {
        Ok(self
            .working
            .assignments
            .iter()
            .filter(|a| a.member_id == member_id)
            .max_by(|a, b| a.assigned_at.cmp(&b.assigned_at))
            .cloned())
    }

    async fn assign(&mut self, assignment: &TrainerAssignment) -> Result<(), DomainError> {
        self.working.assignments.push(assignment.clone());
        Ok(())
    }
}

#[async_trait]
impl PlanRepository for InMemoryUnitOfWork {
    async fn find_by_id(&mut self, id: PlanId) -> Result<Option<MembershipPlan>, DomainError> {
        Ok(self.working.plans.get(&id).cloned())
    }

    async fn find_by_name(&mut self, name: &str) -> Result<Option<MembershipPlan>, DomainError> {
        let key = MembershipPlan::name_key(name);
        Ok(self
            .working
            .plans
            .values()
            .find(|p| !p.is_deleted && MembershipPlan::name_key(&p.name) == key)
            .cloned())
    }

    async fn list(&mut self) -> Result<Vec<MembershipPlan>, DomainError> {
        let mut plans: Vec<_> = self
            .working
            .plans
            .values()
            .filter(|p| !p.is_deleted)
            .cloned()
            .collect();
        plans.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(plans)
    }

    async fn insert(&mut self, plan: &MembershipPlan) -> Result<(), DomainError> {
        self.working.check_plan_name(plan)?;
        self.working.plans.insert(plan.id, plan.clone());
        Ok(())
    }

    async fn update(&mut self, plan: &MembershipPlan) -> Result<(), DomainError> {
        if !self.working.plans.contains_key(&plan.id) {
            return Err(DomainError::new(ErrorCode::PlanNotFound, "Plan not found")
                .with_detail("id", plan.id.to_string()));
        }
        self.working.check_plan_name(plan)?;
        self.working.plans.insert(plan.id, plan.clone());
        Ok(())
    }
}

#[async_trait]
impl MembershipRepository for InMemoryUnitOfWork {
    async fn find_by_id(&mut self, id: MembershipId) -> Result<Option<Membership>, DomainError> {
        Ok(self.working.memberships.get(&id).cloned())
    }

    async fn find_for_update(
        &mut self,
        id: MembershipId,
    ) -> Result<Option<Membership>, DomainError> {
        Ok(self.working.memberships.get(&id).cloned())
    }

    async fn find_open_for_member(
        &mut self,
        member_id: UserId,
    ) -> Result<Vec<Membership>, DomainError> {
        Ok(self
            .working
            .memberships
            .values()
            .filter(|m| m.member_id == member_id && m.is_open())
            .cloned()
            .collect())
    }

    async fn list_for_member(
        &mut self,
        member_id: UserId,
    ) -> Result<Vec<Membership>, DomainError> {
        let mut rows: Vec<_> = self
            .working
            .memberships
            .values()
            .filter(|m| m.member_id == member_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_lapsed(&mut self, now: Timestamp) -> Result<Vec<Membership>, DomainError> {
        let mut rows: Vec<_> = self
            .working
            .memberships
            .values()
            .filter(|m| m.is_lapsed(now))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.end_date.cmp(&b.end_date));
        Ok(rows)
    }

    async fn find_active_ending_between(
        &mut self,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Membership>, DomainError> {
        let mut rows: Vec<_> = self
            .working
            .memberships
            .values()
            .filter(|m| {
                m.status == MembershipStatus::Active && m.end_date >= from && m.end_date <= to
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.end_date.cmp(&b.end_date));
        Ok(rows)
    }

    async fn insert(&mut self, membership: &Membership) -> Result<(), DomainError> {
        self.working.check_single_open(membership)?;
        self.working
            .memberships
            .insert(membership.id, membership.clone());
        Ok(())
    }

    async fn update(&mut self, membership: &Membership) -> Result<(), DomainError> {
        if !self.working.memberships.contains_key(&membership.id) {
            return Err(
                DomainError::new(ErrorCode::MembershipNotFound, "Membership not found")
                    .with_detail("id", membership.id.to_string()),
            );
        }
        self.working.check_single_open(membership)?;
        self.working
            .memberships
            .insert(membership.id, membership.clone());
        Ok(())
    }
}

#[async_trait]
impl PaymentRepository for InMemoryUnitOfWork {
    async fn insert(&mut self, payment: &Payment) -> Result<(), DomainError> {
        self.working.payments.push(payment.clone());
        Ok(())
    }

    async fn update(&mut self, payment: &Payment) -> Result<(), DomainError> {
        let slot = self
            .working
            .payments
            .iter_mut()
            .find(|p| p.id == payment.id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::PaymentNotFound, "Payment not found")
                    .with_detail("id", payment.id.to_string())
            })?;
        *slot = payment.clone();
        Ok(())
    }

    async fn find_latest_pending(
        &mut self,
        membership_id: MembershipId,
    ) -> Result<Option<Payment>, DomainError> {
        Ok(self
            .working
            .payments
            .iter()
            .filter(|p| p.membership_id == membership_id && p.status == PaymentStatus::Pending)
            .max_by(|a, b| a.created_at.cmp(&b.created_at))
            .cloned())
    }

    async fn list_for_membership(
        &mut self,
        membership_id: MembershipId,
    ) -> Result<Vec<Payment>, DomainError> {
        Ok(self
            .working
            .payments
            .iter()
            .filter(|p| p.membership_id == membership_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl WalletRepository for InMemoryUnitOfWork {
    async fn append(&mut self, transaction: &WalletTransaction) -> Result<(), DomainError> {
        self.working.wallet.push(transaction.clone());
        Ok(())
    }

    async fn balance(&mut self, member_id: UserId) -> Result<Money, DomainError> {
        Ok(self.working.ledger_balance(member_id))
    }

    async fn list_for_member(
        &mut self,
        member_id: UserId,
    ) -> Result<Vec<WalletTransaction>, DomainError> {
        Ok(newest_first(
            self.working
                .wallet
                .iter()
                .filter(|t| t.member_id == member_id)
                .cloned(),
            |t| t.created_at,
        ))
    }
}

#[async_trait]
impl CommissionRepository for InMemoryUnitOfWork {
    async fn exists(
        &mut self,
        membership_id: MembershipId,
        source: CommissionSource,
    ) -> Result<bool, DomainError> {
        Ok(self
            .working
            .commissions
            .iter()
            .any(|c| c.membership_id == membership_id && c.source == source))
    }

    async fn insert_if_absent(&mut self, commission: &Commission) -> Result<bool, DomainError> {
        if self
            .exists(commission.membership_id, commission.source)
            .await?
        {
            return Ok(false);
        }
        self.working.commissions.push(commission.clone());
        Ok(true)
    }

    async fn find_for_update(
        &mut self,
        id: CommissionId,
    ) -> Result<Option<Commission>, DomainError> {
        Ok(self.working.commissions.iter().find(|c| c.id == id).cloned())
    }

    async fn update(&mut self, commission: &Commission) -> Result<(), DomainError> {
        let slot = self
            .working
            .commissions
            .iter_mut()
            .find(|c| c.id == commission.id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::CommissionNotFound, "Commission not found")
                    .with_detail("id", commission.id.to_string())
            })?;
        *slot = commission.clone();
        Ok(())
    }

    async fn list_for_trainer(
        &mut self,
        trainer_id: UserId,
    ) -> Result<Vec<Commission>, DomainError> {
        Ok(newest_first(
            self.working
                .commissions
                .iter()
                .filter(|c| c.trainer_id == trainer_id)
                .cloned(),
            |c| c.created_at,
        ))
    }

    async fn list_for_membership(
        &mut self,
        membership_id: MembershipId,
    ) -> Result<Vec<Commission>, DomainError> {
        Ok(self
            .working
            .commissions
            .iter()
            .filter(|c| c.membership_id == membership_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryUnitOfWork {
    async fn insert(&mut self, invoice: &Invoice) -> Result<(), DomainError> {
        self.working.invoices.push(invoice.clone());
        Ok(())
    }

    async fn attach_file(&mut self, id: InvoiceId, path: &str) -> Result<(), DomainError> {
        let invoice = self
            .working
            .invoices
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::InvoiceNotFound, "Invoice not found")
                    .with_detail("id", id.to_string())
            })?;
        invoice.file_path = Some(path.to_string());
        Ok(())
    }

    async fn list_for_member(&mut self, member_id: UserId) -> Result<Vec<Invoice>, DomainError> {
        Ok(newest_first(
            self.working
                .invoices
                .iter()
                .filter(|i| i.member_id == member_id)
                .cloned(),
            |i| i.issued_at,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::PlanId;
    use crate::domain::membership::plan::tests::details;
    use crate::domain::membership::{MembershipSource, NewMembership};
    use crate::domain::wallet::WalletTransactionType;

    fn plan() -> MembershipPlan {
        MembershipPlan::create(PlanId::new(), details("Gold", 100), Timestamp::now()).unwrap()
    }

    fn pending_for(member: UserId, plan: &MembershipPlan) -> Membership {
        Membership::open_pending(
            NewMembership {
                id: MembershipId::new(),
                member_id: member,
                branch_id: None,
                source: MembershipSource::Online,
                auto_renew: false,
            },
            plan,
            Timestamp::now(),
        )
    }

    #[tokio::test]
    async fn dropped_unit_of_work_rolls_back() {
        let store = InMemoryStore::new();
        let plan = plan();
        {
            let mut uow = store.begin().await.unwrap();
            uow.plans().insert(&plan).await.unwrap();
        }
        assert!(store.snapshot().await.plans.is_empty());
    }

    #[tokio::test]
    async fn commit_publishes_writes() {
        let store = InMemoryStore::new();
        let plan = plan();
        let mut uow = store.begin().await.unwrap();
        uow.plans().insert(&plan).await.unwrap();
        uow.commit().await.unwrap();

        assert!(store.snapshot().await.plans.contains_key(&plan.id));
    }

    #[tokio::test]
    async fn second_open_membership_is_rejected() {
        let store = InMemoryStore::new();
        let plan = plan();
        let member = UserId::new();

        let mut uow = store.begin().await.unwrap();
        uow.memberships()
            .insert(&pending_for(member, &plan))
            .await
            .unwrap();
        let err = uow
            .memberships()
            .insert(&pending_for(member, &plan))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MembershipAlreadyOpen);
    }

    #[tokio::test]
    async fn duplicate_plan_name_ignores_case_and_deleted_rows() {
        let store = InMemoryStore::new();
        let mut gold = plan();
        let mut uow = store.begin().await.unwrap();
        uow.plans().insert(&gold).await.unwrap();

        let mut shouting = plan();
        shouting.name = "GOLD".to_string();
        let err = uow.plans().insert(&shouting).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicatePlanName);

        gold.soft_delete(Timestamp::now());
        uow.plans().update(&gold).await.unwrap();
        uow.plans().insert(&shouting).await.unwrap();
    }

    #[tokio::test]
    async fn commission_insert_is_idempotent() {
        let store = InMemoryStore::new();
        let membership = MembershipId::new();
        let make = || {
            Commission::calculate(
                UserId::new(),
                membership,
                None,
                CommissionSource::Activation,
                crate::domain::foundation::Percentage::ZERO,
                Money::from_units(100),
                Timestamp::now(),
            )
        };

        let mut uow = store.begin().await.unwrap();
        assert!(uow.commissions().insert_if_absent(&make()).await.unwrap());
        assert!(!uow.commissions().insert_if_absent(&make()).await.unwrap());
        assert_eq!(
            uow.commissions()
                .list_for_membership(membership)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn balance_includes_uncommitted_rows() {
        let store = InMemoryStore::new();
        let member = UserId::new();
        let mut uow = store.begin().await.unwrap();
        let row = WalletTransaction::credit(
            member,
            Money::from_units(25),
            WalletTransactionType::Credit,
            None,
            "top-up",
            member,
            Timestamp::now(),
        )
        .unwrap();
        uow.wallet().append(&row).await.unwrap();

        assert_eq!(uow.wallet().balance(member).await.unwrap(), Money::from_units(25));
        drop(uow);
        assert_eq!(store.snapshot().await.ledger_balance(member), Money::ZERO);
    }
}
