//! Axum router configuration for membership endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{
    cancel_membership, confirm_payment, create_membership, freeze_membership, get_membership,
    list_memberships, reject_payment, resume_membership, review_payment, submit_proof,
    upgrade_membership,
};

/// Create the membership API router.
///
/// # Routes
///
/// ## Member endpoints
/// - `POST /members/:member_id/memberships` - Open a membership
/// - `GET /members/:member_id/memberships` - Membership history
/// - `POST /members/:member_id/memberships/upgrade` - Move to a pricier plan
/// - `GET /memberships/:id` - Membership with payments
/// - `POST /memberships/:id/payments` - Resubmit a payment proof
/// - `POST /memberships/:id/freeze`, `/resume`, `/cancel`
///
/// ## Admin endpoints
/// - `POST /memberships/:id/payments/confirm`
/// - `POST /memberships/:id/payments/reject`
/// - `POST /memberships/:id/payments/review`
pub fn membership_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/members/:member_id/memberships",
            post(create_membership).get(list_memberships),
        )
        .route(
            "/members/:member_id/memberships/upgrade",
            post(upgrade_membership),
        )
        .route("/memberships/:id", get(get_membership))
        .route("/memberships/:id/payments", post(submit_proof))
        .route("/memberships/:id/payments/confirm", post(confirm_payment))
        .route("/memberships/:id/payments/reject", post(reject_payment))
        .route("/memberships/:id/payments/review", post(review_payment))
        .route("/memberships/:id/freeze", post(freeze_membership))
        .route("/memberships/:id/resume", post(resume_membership))
        .route("/memberships/:id/cancel", post(cancel_membership))
}
