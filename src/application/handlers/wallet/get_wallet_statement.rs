//! GetWalletStatementHandler - Ledger history with a recomputed balance.

use std::sync::Arc;

use crate::domain::foundation::{Actor, BranchScoped, UserId};
use crate::domain::membership::MembershipError;
use crate::ports::{AccessPolicy, UnitOfWorkFactory};

use super::WalletStatement;

#[derive(Debug, Clone)]
pub struct GetWalletStatementQuery {
    pub actor: Actor,
    pub member_id: UserId,
}

pub struct GetWalletStatementHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    access: Arc<dyn AccessPolicy>,
}

impl GetWalletStatementHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, access: Arc<dyn AccessPolicy>) -> Self {
        Self {
            uow_factory,
            access,
        }
    }

    pub async fn handle(
        &self,
        query: GetWalletStatementQuery,
    ) -> Result<WalletStatement, MembershipError> {
        self.access
            .ensure_member_owns_resource(&query.actor, query.member_id)
            .await?;

        // Read-only; dropped without commit
        let mut uow = self.uow_factory.begin().await?;
        let member = uow
            .members()
            .find_by_id(query.member_id)
            .await?
            .ok_or_else(|| MembershipError::member_not_found(query.member_id))?;
        member.check_branch(&query.actor)?;

        let balance = uow.wallet().balance(query.member_id).await?;
        let transactions = uow.wallet().list_for_member(query.member_id).await?;

        Ok(WalletStatement {
            member_id: query.member_id,
            balance,
            transactions,
        })
    }
}
