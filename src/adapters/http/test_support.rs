//! In-process HTTP client for router tests.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::application::handlers::automation::RunSubscriptionSweepHandler;
use crate::application::handlers::test_support::Harness;
use crate::config::ServerConfig;
use crate::domain::foundation::{Actor, UserId};

use super::middleware::auth::{BRANCH_HEADER, ROLE_HEADER, USER_ID_HEADER};
use super::router::build_app;
use super::state::AppState;

pub(crate) fn admin() -> Actor {
    Actor::platform_admin(UserId::new())
}

pub(crate) fn as_member(id: UserId) -> Actor {
    Actor::member(id, None)
}

pub(crate) struct TestApp {
    pub h: Harness,
    app: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let h = Harness::new();
        let sweep = Arc::new(RunSubscriptionSweepHandler::new(
            h.factory(),
            h.effects(),
            3,
        ));
        let state = AppState::new(h.factory(), h.access(), h.gateway(), h.effects(), sweep);
        let app = build_app(state, &ServerConfig::default());
        Self { h, app }
    }

    pub async fn raw(
        &self,
        method: Method,
        uri: &str,
        actor: Option<Actor>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(actor) = actor {
            builder = builder
                .header(USER_ID_HEADER, actor.user_id.to_string())
                .header(ROLE_HEADER, actor.role.to_string());
            if let Some(branch) = actor.branch_id {
                builder = builder.header(BRANCH_HEADER, branch.to_string());
            }
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.app.clone().oneshot(request).await.unwrap()
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        actor: Option<Actor>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.raw(method, uri, actor, body).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn raw_get(&self, uri: &str, actor: Actor) -> Response {
        self.raw(Method::GET, uri, Some(actor), None).await
    }

    pub async fn get(&self, uri: &str, actor: Actor) -> (StatusCode, Value) {
        self.call(Method::GET, uri, Some(actor), None).await
    }

    pub async fn get_as(&self, uri: &str, actor: Option<Actor>) -> (StatusCode, Value) {
        self.call(Method::GET, uri, actor, None).await
    }

    pub async fn post(&self, uri: &str, actor: Actor, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(actor), Some(body)).await
    }

    pub async fn post_empty(&self, uri: &str, actor: Actor) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(actor), None).await
    }

    pub async fn delete(&self, uri: &str, actor: Actor) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, Some(actor), None).await
    }
}
