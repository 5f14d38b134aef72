//! HTTP handlers for plan catalogue endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::adapters::http::error::{parse_path_id, ApiError};
use crate::adapters::http::middleware::RequireActor;
use crate::adapters::http::state::AppState;
use crate::application::handlers::plan::{
    CreatePlanCommand, DeletePlanCommand, ListPlansQuery, UpdatePlanCommand,
};
use crate::domain::foundation::PlanId;

use super::dto::{PlanListResponse, PlanRequest, PlanResponse};

fn plan_id(raw: &str) -> Result<PlanId, ApiError> {
    parse_path_id(raw, "plan_id")
}

/// GET /api/plans - Plans visible to the caller
pub async fn list_plans(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
) -> Result<impl IntoResponse, ApiError> {
    let plans = state.list_plans.handle(ListPlansQuery { actor }).await?;
    Ok(Json(PlanListResponse {
        plans: plans.into_iter().map(PlanResponse::from).collect(),
    }))
}

/// POST /api/plans
pub async fn create_plan(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Json(req): Json<PlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = CreatePlanCommand {
        actor,
        details: req.into(),
    };

    let plan = state.create_plan.handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(PlanResponse::from(plan))))
}

/// PUT /api/plans/:id
pub async fn update_plan(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
    Json(req): Json<PlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = UpdatePlanCommand {
        actor,
        plan_id: plan_id(&id)?,
        details: req.into(),
    };

    let plan = state.update_plan.handle(cmd).await?;
    Ok(Json(PlanResponse::from(plan)))
}

/// DELETE /api/plans/:id - Soft delete; existing memberships keep the plan
pub async fn delete_plan(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = DeletePlanCommand {
        actor,
        plan_id: plan_id(&id)?,
    };

    state.delete_plan.handle(cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}
