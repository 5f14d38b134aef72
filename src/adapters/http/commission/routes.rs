//! Axum router configuration for trainer commission endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{list_commissions, mark_paid};

/// Create the commission API router.
///
/// # Routes
/// - `GET /trainers/:trainer_id/commissions` - Trainer's commissions (`?unpaid_only=true`)
/// - `POST /commissions/:id/pay` - Record a payout (admin)
pub fn commission_routes() -> Router<AppState> {
    Router::new()
        .route("/trainers/:trainer_id/commissions", get(list_commissions))
        .route("/commissions/:id/pay", post(mark_paid))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::adapters::http::test_support::{admin, TestApp};
    use crate::domain::foundation::{Actor, UserId};

    #[tokio::test]
    async fn desk_sale_pays_trainer_once() {
        let app = TestApp::new();
        let member = app.h.member(None).await;
        let trainer = app.h.trainer_for(member).await;
        let plan = app.h.plan("Gold", 100).await;

        let (status, _) = app
            .post(
                &format!("/api/members/{}/memberships", member),
                admin(),
                json!({ "plan_id": plan.id, "source": "in_gym", "amount": "100" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let as_trainer = Actor::trainer(trainer, None);
        let uri = format!("/api/trainers/{}/commissions?unpaid_only=true", trainer);
        let (status, body) = app.get(&uri, as_trainer.clone()).await;
        assert_eq!(status, StatusCode::OK);
        let commissions = body["commissions"].as_array().unwrap();
        assert_eq!(commissions.len(), 1);
        let id = commissions[0]["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .post_empty(&format!("/api/commissions/{}/pay", id), admin())
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_paid"], true);

        let (status, body) = app
            .post_empty(&format!("/api/commissions/{}/pay", id), admin())
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error_code"], "COMMISSION_ALREADY_PAID");

        let (_, body) = app.get(&uri, as_trainer).await;
        assert!(body["commissions"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn trainer_cannot_read_another_trainers_commissions() {
        let app = TestApp::new();
        let (status, _) = app
            .get(
                &format!("/api/trainers/{}/commissions", UserId::new()),
                Actor::trainer(UserId::new(), None),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
