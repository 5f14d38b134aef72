//! Shared application state for the HTTP layer.

use std::sync::Arc;

use crate::application::handlers::automation::RunSubscriptionSweepHandler;
use crate::application::handlers::commission::{
    ListTrainerCommissionsHandler, MarkCommissionPaidHandler,
};
use crate::application::handlers::membership::{
    CancelMembershipHandler, ConfirmPaymentHandler, CreateMembershipHandler,
    FreezeMembershipHandler, GetMembershipHandler, ListMemberMembershipsHandler,
    RejectPaymentHandler, ResumeMembershipHandler, ReviewPaymentHandler,
    SubmitPaymentProofHandler, UpgradeMembershipHandler,
};
use crate::application::handlers::plan::{
    CreatePlanHandler, DeletePlanHandler, ListPlansHandler, UpdatePlanHandler,
};
use crate::application::handlers::wallet::{
    AdjustWalletHandler, ChargeSessionBookingHandler, GetWalletStatementHandler,
    PurchaseAddOnHandler, TopUpWalletHandler,
};
use crate::application::SideEffects;
use crate::ports::{AccessPolicy, PaymentGateway, UnitOfWorkFactory};

/// Every application handler, built once at startup and shared across requests.
#[derive(Clone)]
pub struct AppState {
    pub create_membership: Arc<CreateMembershipHandler>,
    pub get_membership: Arc<GetMembershipHandler>,
    pub list_memberships: Arc<ListMemberMembershipsHandler>,
    pub submit_proof: Arc<SubmitPaymentProofHandler>,
    pub confirm_payment: Arc<ConfirmPaymentHandler>,
    pub reject_payment: Arc<RejectPaymentHandler>,
    pub review_payment: Arc<ReviewPaymentHandler>,
    pub upgrade_membership: Arc<UpgradeMembershipHandler>,
    pub freeze_membership: Arc<FreezeMembershipHandler>,
    pub resume_membership: Arc<ResumeMembershipHandler>,
    pub cancel_membership: Arc<CancelMembershipHandler>,

    pub top_up_wallet: Arc<TopUpWalletHandler>,
    pub adjust_wallet: Arc<AdjustWalletHandler>,
    pub charge_session: Arc<ChargeSessionBookingHandler>,
    pub purchase_add_on: Arc<PurchaseAddOnHandler>,
    pub wallet_statement: Arc<GetWalletStatementHandler>,

    pub create_plan: Arc<CreatePlanHandler>,
    pub update_plan: Arc<UpdatePlanHandler>,
    pub delete_plan: Arc<DeletePlanHandler>,
    pub list_plans: Arc<ListPlansHandler>,

    pub list_commissions: Arc<ListTrainerCommissionsHandler>,
    pub mark_commission_paid: Arc<MarkCommissionPaidHandler>,

    pub sweep: Arc<RunSubscriptionSweepHandler>,
}

impl AppState {
    pub fn new(
        uow_factory: Arc<dyn UnitOfWorkFactory>,
        access: Arc<dyn AccessPolicy>,
        gateway: Arc<dyn PaymentGateway>,
        effects: SideEffects,
        sweep: Arc<RunSubscriptionSweepHandler>,
    ) -> Self {
        let confirm_payment = Arc::new(ConfirmPaymentHandler::new(
            uow_factory.clone(),
            access.clone(),
            effects.clone(),
        ));
        let reject_payment = Arc::new(RejectPaymentHandler::new(
            uow_factory.clone(),
            access.clone(),
            effects.clone(),
        ));

        Self {
            create_membership: Arc::new(CreateMembershipHandler::new(
                uow_factory.clone(),
                access.clone(),
                gateway,
                effects.clone(),
            )),
            get_membership: Arc::new(GetMembershipHandler::new(uow_factory.clone(), access.clone())),
            list_memberships: Arc::new(ListMemberMembershipsHandler::new(
                uow_factory.clone(),
                access.clone(),
            )),
            submit_proof: Arc::new(SubmitPaymentProofHandler::new(
                uow_factory.clone(),
                access.clone(),
            )),
            review_payment: Arc::new(ReviewPaymentHandler::new(
                confirm_payment.clone(),
                reject_payment.clone(),
            )),
            confirm_payment,
            reject_payment,
            upgrade_membership: Arc::new(UpgradeMembershipHandler::new(
                uow_factory.clone(),
                access.clone(),
                effects.clone(),
            )),
            freeze_membership: Arc::new(FreezeMembershipHandler::new(
                uow_factory.clone(),
                access.clone(),
            )),
            resume_membership: Arc::new(ResumeMembershipHandler::new(
                uow_factory.clone(),
                access.clone(),
            )),
            cancel_membership: Arc::new(CancelMembershipHandler::new(
                uow_factory.clone(),
                access.clone(),
            )),

            top_up_wallet: Arc::new(TopUpWalletHandler::new(uow_factory.clone(), access.clone())),
            adjust_wallet: Arc::new(AdjustWalletHandler::new(uow_factory.clone(), access.clone())),
            charge_session: Arc::new(ChargeSessionBookingHandler::new(
                uow_factory.clone(),
                access.clone(),
            )),
            purchase_add_on: Arc::new(PurchaseAddOnHandler::new(
                uow_factory.clone(),
                access.clone(),
                effects,
            )),
            wallet_statement: Arc::new(GetWalletStatementHandler::new(
                uow_factory.clone(),
                access.clone(),
            )),

            create_plan: Arc::new(CreatePlanHandler::new(uow_factory.clone(), access.clone())),
            update_plan: Arc::new(UpdatePlanHandler::new(uow_factory.clone(), access.clone())),
            delete_plan: Arc::new(DeletePlanHandler::new(uow_factory.clone(), access.clone())),
            list_plans: Arc::new(ListPlansHandler::new(uow_factory.clone())),

            list_commissions: Arc::new(ListTrainerCommissionsHandler::new(
                uow_factory.clone(),
                access.clone(),
            )),
            mark_commission_paid: Arc::new(MarkCommissionPaidHandler::new(uow_factory, access)),

            sweep,
        }
    }
}
