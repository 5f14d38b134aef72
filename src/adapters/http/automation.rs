//! Manual trigger for the subscription sweep.
//!
//! The scheduler runs the same sweep on its own; this endpoint lets a
//! platform admin run it on demand. Repeating it is harmless.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::application::handlers::automation::RunSubscriptionSweepCommand;
use crate::domain::foundation::Timestamp;
use crate::domain::membership::MembershipError;

use super::error::ApiError;
use super::middleware::RequireActor;
use super::state::AppState;

/// POST /api/automation/sweep
pub async fn run_sweep(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
) -> Result<impl IntoResponse, ApiError> {
    if !(actor.is_admin() && actor.is_platform_wide()) {
        return Err(MembershipError::forbidden("Only platform administrators may run the sweep")
            .into());
    }

    tracing::info!(requested_by = %actor.user_id, "Manual subscription sweep");
    let report = state
        .sweep
        .handle(RunSubscriptionSweepCommand {
            now: Timestamp::now(),
        })
        .await?;
    Ok(Json(report))
}

pub fn automation_routes() -> Router<AppState> {
    Router::new().route("/automation/sweep", post(run_sweep))
}
