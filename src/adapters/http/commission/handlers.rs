//! HTTP handlers for trainer commission endpoints.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::adapters::http::error::{parse_path_id, ApiError};
use crate::adapters::http::middleware::RequireActor;
use crate::adapters::http::state::AppState;
use crate::application::handlers::commission::{
    ListTrainerCommissionsQuery, MarkCommissionPaidCommand,
};
use crate::domain::commission::Commission;
use crate::domain::foundation::Money;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommissionFilter {
    #[serde(default)]
    pub unpaid_only: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommissionListResponse {
    pub commissions: Vec<Commission>,
    /// Sum of commissions not yet paid out.
    pub outstanding: Money,
}

/// GET /api/trainers/:trainer_id/commissions?unpaid_only=true
pub async fn list_commissions(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(trainer): Path<String>,
    Query(filter): Query<CommissionFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ListTrainerCommissionsQuery {
        actor,
        trainer_id: parse_path_id(&trainer, "trainer_id")?,
        unpaid_only: filter.unpaid_only,
    };

    let commissions = state.list_commissions.handle(query).await?;
    let outstanding = commissions
        .iter()
        .filter(|c| !c.is_paid)
        .map(|c| c.amount)
        .sum();
    Ok(Json(CommissionListResponse {
        commissions,
        outstanding,
    }))
}

/// POST /api/commissions/:id/pay
pub async fn mark_paid(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = MarkCommissionPaidCommand {
        actor,
        commission_id: parse_path_id(&id, "commission_id")?,
    };

    let commission = state.mark_commission_paid.handle(cmd).await?;
    Ok(Json(commission))
}
