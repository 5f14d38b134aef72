//! Assembles the full HTTP application: routes, state and tower layers.

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::routing::get;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

use super::automation::automation_routes;
use super::commission::commission_routes;
use super::membership::membership_routes;
use super::plan::plan_routes;
use super::state::AppState;
use super::wallet::wallet_routes;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Every API route, without middleware or state.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(membership_routes())
        .merge(wallet_routes())
        .merge(plan_routes())
        .merge(commission_routes())
        .merge(automation_routes())
}

async fn health() -> StatusCode {
    StatusCode::OK
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

/// Builds the application served by `main` and exercised by router tests.
pub fn build_app(state: AppState, server: &ServerConfig) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .layer(CompressionLayer::new())
        .layer(cors_layer(server))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::adapters::http::test_support::{admin, TestApp};

    #[tokio::test]
    async fn health_needs_no_identity() {
        let app = TestApp::new();
        let (status, _) = app.get_as("/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let app = TestApp::new();
        let response = app.raw_get("/api/plans", admin()).await;
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let app = TestApp::new();
        let (status, _) = app.get("/api/nowhere", admin()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
