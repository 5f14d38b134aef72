//! HTTP handlers for membership and payment endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::adapters::http::error::{parse_path_id, ApiError};
use crate::adapters::http::middleware::RequireActor;
use crate::adapters::http::state::AppState;
use crate::application::handlers::membership::{
    CancelMembershipCommand, ConfirmPaymentCommand, CreateMembershipCommand,
    FreezeMembershipCommand, GetMembershipQuery, ListMemberMembershipsQuery,
    RejectPaymentCommand, ResumeMembershipCommand, ReviewPaymentCommand,
    SubmitPaymentProofCommand, UpgradeMembershipCommand,
};
use crate::domain::foundation::{MembershipId, UserId};

use super::dto::{
    CancelMembershipRequest, CreateMembershipRequest, FreezeMembershipRequest,
    MembershipListResponse, MembershipResponse, RejectPaymentRequest, ReviewPaymentRequest,
    SubmitProofRequest, UpgradeMembershipRequest,
};

fn membership_id(raw: &str) -> Result<MembershipId, ApiError> {
    parse_path_id(raw, "membership_id")
}

fn member_id(raw: &str) -> Result<UserId, ApiError> {
    parse_path_id(raw, "member_id")
}

// ════════════════════════════════════════════════════════════════════════════════
// Member-scoped endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/members/:member_id/memberships
pub async fn create_membership(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(member): Path<String>,
    Json(req): Json<CreateMembershipRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = CreateMembershipCommand {
        actor,
        member_id: member_id(&member)?,
        plan_id: req.plan_id,
        source: req.source,
        payment_method: req.payment_method,
        amount: req.amount,
        wallet_to_use: req.wallet_to_use,
        auto_renew: req.auto_renew,
        proof_url: req.proof_url,
    };

    let snapshot = state.create_membership.handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(MembershipResponse::from(snapshot))))
}

/// GET /api/members/:member_id/memberships
pub async fn list_memberships(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(member): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ListMemberMembershipsQuery {
        actor,
        member_id: member_id(&member)?,
    };

    let memberships = state.list_memberships.handle(query).await?;
    Ok(Json(MembershipListResponse::from(memberships)))
}

/// POST /api/members/:member_id/memberships/upgrade
pub async fn upgrade_membership(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(member): Path<String>,
    Json(req): Json<UpgradeMembershipRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = UpgradeMembershipCommand {
        actor,
        member_id: member_id(&member)?,
        new_plan_id: req.new_plan_id,
    };

    let snapshot = state.upgrade_membership.handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(MembershipResponse::from(snapshot))))
}

// ════════════════════════════════════════════════════════════════════════════════
// Membership-scoped endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/memberships/:id
pub async fn get_membership(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let query = GetMembershipQuery {
        actor,
        membership_id: membership_id(&id)?,
    };

    let snapshot = state.get_membership.handle(query).await?;
    Ok(Json(MembershipResponse::from(snapshot)))
}

/// POST /api/memberships/:id/payments - Submit a new proof after a rejection
pub async fn submit_proof(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
    Json(req): Json<SubmitProofRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = SubmitPaymentProofCommand {
        actor,
        membership_id: membership_id(&id)?,
        amount: req.amount,
        proof_url: req.proof_url,
    };

    let snapshot = state.submit_proof.handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(MembershipResponse::from(snapshot))))
}

/// POST /api/memberships/:id/payments/confirm
pub async fn confirm_payment(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ConfirmPaymentCommand {
        actor,
        membership_id: membership_id(&id)?,
    };

    let snapshot = state.confirm_payment.handle(cmd).await?;
    Ok(Json(MembershipResponse::from(snapshot)))
}

/// POST /api/memberships/:id/payments/reject
pub async fn reject_payment(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
    Json(req): Json<RejectPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = RejectPaymentCommand {
        actor,
        membership_id: membership_id(&id)?,
        reason: req.reason,
    };

    let snapshot = state.reject_payment.handle(cmd).await?;
    Ok(Json(MembershipResponse::from(snapshot)))
}

/// POST /api/memberships/:id/payments/review
pub async fn review_payment(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
    Json(req): Json<ReviewPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ReviewPaymentCommand {
        actor,
        membership_id: membership_id(&id)?,
        approve: req.approve,
        reason: req.reason,
    };

    let snapshot = state.review_payment.handle(cmd).await?;
    Ok(Json(MembershipResponse::from(snapshot)))
}

/// POST /api/memberships/:id/freeze
pub async fn freeze_membership(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
    req: Option<Json<FreezeMembershipRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = req.unwrap_or_default();
    let cmd = FreezeMembershipCommand {
        actor,
        membership_id: membership_id(&id)?,
        start: req.start,
    };

    let snapshot = state.freeze_membership.handle(cmd).await?;
    Ok(Json(MembershipResponse::from(snapshot)))
}

/// POST /api/memberships/:id/resume
pub async fn resume_membership(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ResumeMembershipCommand {
        actor,
        membership_id: membership_id(&id)?,
    };

    let snapshot = state.resume_membership.handle(cmd).await?;
    Ok(Json(MembershipResponse::from(snapshot)))
}

/// POST /api/memberships/:id/cancel
pub async fn cancel_membership(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
    req: Option<Json<CancelMembershipRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = req.unwrap_or_default();
    let cmd = CancelMembershipCommand {
        actor,
        membership_id: membership_id(&id)?,
        reason: req.reason,
    };

    let snapshot = state.cancel_membership.handle(cmd).await?;
    Ok(Json(MembershipResponse::from(snapshot)))
}
