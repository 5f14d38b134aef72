//! Axum router configuration for wallet endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::state::AppState;

use super::handlers::{adjust, charge_session, get_statement, purchase_add_on, top_up};

/// Create the wallet API router.
///
/// # Routes
/// - `GET /members/:member_id/wallet` - Balance and history, newest first
/// - `POST /members/:member_id/wallet/top-ups` - Admin credit
/// - `POST /members/:member_id/wallet/adjustments` - Admin signed correction
/// - `POST /members/:member_id/wallet/session-charges` - Session booking debit
/// - `POST /members/:member_id/wallet/add-ons` - Add-on purchase
pub fn wallet_routes() -> Router<AppState> {
    Router::new()
        .route("/members/:member_id/wallet", get(get_statement))
        .route("/members/:member_id/wallet/top-ups", post(top_up))
        .route("/members/:member_id/wallet/adjustments", post(adjust))
        .route(
            "/members/:member_id/wallet/session-charges",
            post(charge_session),
        )
        .route("/members/:member_id/wallet/add-ons", post(purchase_add_on))
}
