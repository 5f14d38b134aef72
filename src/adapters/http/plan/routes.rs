//! Axum router configuration for plan catalogue endpoints.

use axum::routing::{get, put};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{create_plan, delete_plan, list_plans, update_plan};

/// Create the plan API router.
///
/// # Routes
/// - `GET /plans` - Catalogue for the caller's branch
/// - `POST /plans` - Create (admin)
/// - `PUT /plans/:id` - Replace details (admin)
/// - `DELETE /plans/:id` - Soft delete (admin)
pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/plans", get(list_plans).post(create_plan))
        .route("/plans/:id", put(update_plan).delete(delete_plan))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::adapters::http::test_support::{admin, as_member, TestApp};
    use crate::domain::foundation::UserId;

    fn gold() -> serde_json::Value {
        json!({ "name": "Gold", "duration_days": 30, "price": "100" })
    }

    #[tokio::test]
    async fn admin_creates_and_member_lists() {
        let app = TestApp::new();

        let (status, body) = app.post("/api/plans", admin(), gold()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "Gold");
        assert!(body.get("effective_price").is_some());

        let (status, body) = app.get("/api/plans", as_member(UserId::new())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["plans"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_name_is_conflict() {
        let app = TestApp::new();
        app.post("/api/plans", admin(), gold()).await;

        let (status, body) = app
            .post(
                "/api/plans",
                admin(),
                json!({ "name": "gold", "duration_days": 90, "price": "250" }),
            )
            .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error_code"], "DUPLICATE_PLAN_NAME");
    }

    #[tokio::test]
    async fn member_cannot_create_plan() {
        let app = TestApp::new();
        let (status, _) = app.post("/api/plans", as_member(UserId::new()), gold()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn deleted_plan_disappears_from_catalogue() {
        let app = TestApp::new();
        let plan = app.h.plan("Silver", 60).await;

        let (status, _) = app.delete(&format!("/api/plans/{}", plan.id), admin()).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = app.get("/api/plans", admin()).await;
        assert!(body["plans"].as_array().unwrap().is_empty());

        let (status, _) = app.delete(&format!("/api/plans/{}", plan.id), admin()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
