//! HTTP handlers for wallet endpoints.
//!
//! Every mutation answers with the committed transaction and the balance
//! read back after commit.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::adapters::http::error::{parse_path_id, ApiError};
use crate::adapters::http::middleware::RequireActor;
use crate::adapters::http::state::AppState;
use crate::application::handlers::wallet::{
    AdjustWalletCommand, ChargeSessionBookingCommand, GetWalletStatementQuery,
    PurchaseAddOnCommand, TopUpWalletCommand,
};
use crate::domain::foundation::UserId;

use super::dto::{AddOnRequest, AdjustmentRequest, SessionChargeRequest, TopUpRequest};

fn member_id(raw: &str) -> Result<UserId, ApiError> {
    parse_path_id(raw, "member_id")
}

/// GET /api/members/:member_id/wallet
pub async fn get_statement(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(member): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let query = GetWalletStatementQuery {
        actor,
        member_id: member_id(&member)?,
    };

    let statement = state.wallet_statement.handle(query).await?;
    Ok(Json(statement))
}

/// POST /api/members/:member_id/wallet/top-ups
pub async fn top_up(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(member): Path<String>,
    Json(req): Json<TopUpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = TopUpWalletCommand {
        actor,
        member_id: member_id(&member)?,
        amount: req.amount,
        description: req.description,
    };

    let receipt = state.top_up_wallet.handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// POST /api/members/:member_id/wallet/adjustments
pub async fn adjust(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(member): Path<String>,
    Json(req): Json<AdjustmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = AdjustWalletCommand {
        actor,
        member_id: member_id(&member)?,
        amount: req.amount,
        reason: req.reason,
    };

    let receipt = state.adjust_wallet.handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// POST /api/members/:member_id/wallet/session-charges
///
/// A lost race with another debit answers 409 with `retryable: true`.
pub async fn charge_session(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(member): Path<String>,
    Json(req): Json<SessionChargeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ChargeSessionBookingCommand {
        actor,
        member_id: member_id(&member)?,
        amount: req.amount,
        session_ref: req.session_ref,
    };

    let receipt = state.charge_session.handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// POST /api/members/:member_id/wallet/add-ons
pub async fn purchase_add_on(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(member): Path<String>,
    Json(req): Json<AddOnRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = PurchaseAddOnCommand {
        actor,
        member_id: member_id(&member)?,
        amount: req.amount,
        description: req.description,
    };

    let receipt = state.purchase_add_on.handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
