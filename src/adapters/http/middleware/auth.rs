//! Identity extraction for axum handlers.
//!
//! The billing engine trusts an upstream gateway to authenticate callers and
//! forward who they are in three headers:
//!
//! ```text
//! X-User-Id:   <uuid>
//! X-User-Role: admin | trainer | member
//! X-Branch-Id: <uuid>            (optional; absent means platform-wide admin)
//! ```
//!
//! `RequireActor` turns those headers into a domain `Actor`. The `system`
//! role is never accepted from a request.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::domain::foundation::{Actor, AuthError, BranchId, Role, UserId};

use super::super::error::ErrorResponse;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const ROLE_HEADER: &str = "X-User-Role";
pub const BRANCH_HEADER: &str = "X-Branch-Id";

/// Extractor that requires a caller identity.
#[derive(Debug, Clone)]
pub struct RequireActor(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for RequireActor
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        actor_from_headers(&parts.headers)
            .map(RequireActor)
            .map_err(AuthRejection)
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

pub fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, AuthError> {
    let user_id = header(headers, USER_ID_HEADER)
        .ok_or(AuthError::MissingIdentity)?
        .parse::<UserId>()
        .map_err(|e| AuthError::InvalidIdentity(format!("{}: {}", USER_ID_HEADER, e)))?;

    let role = header(headers, ROLE_HEADER)
        .ok_or(AuthError::MissingIdentity)?
        .parse::<Role>()?;

    let branch_id = header(headers, BRANCH_HEADER)
        .map(|raw| {
            raw.parse::<BranchId>()
                .map_err(|e| AuthError::InvalidIdentity(format!("{}: {}", BRANCH_HEADER, e)))
        })
        .transpose()?;

    Ok(Actor::new(user_id, role, branch_id))
}

/// Rejection returned when identity headers are missing or malformed.
#[derive(Debug)]
pub struct AuthRejection(pub AuthError);

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self.0, "Rejected request identity");
        let body = ErrorResponse::new("UNAUTHORIZED", self.0.to_string());
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request};

    fn parts(headers: &[(&'static str, String)]) -> Parts {
        let mut builder = Request::builder().uri("/test");
        for (name, value) in headers {
            builder = builder.header(*name, HeaderValue::from_str(value).unwrap());
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn member_identity_is_extracted() {
        let id = UserId::new();
        let branch = BranchId::new();
        let mut parts = parts(&[
            (USER_ID_HEADER, id.to_string()),
            (ROLE_HEADER, "member".to_string()),
            (BRANCH_HEADER, branch.to_string()),
        ]);

        let RequireActor(actor) = RequireActor::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(actor, Actor::member(id, Some(branch)));
    }

    #[tokio::test]
    async fn admin_without_branch_is_platform_wide() {
        let mut parts = parts(&[
            (USER_ID_HEADER, UserId::new().to_string()),
            (ROLE_HEADER, "Admin".to_string()),
        ]);

        let RequireActor(actor) = RequireActor::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert!(actor.is_platform_wide());
    }

    #[tokio::test]
    async fn missing_headers_are_rejected() {
        let mut parts = parts(&[]);
        let result = RequireActor::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthRejection(AuthError::MissingIdentity))));
    }

    #[tokio::test]
    async fn system_role_cannot_be_claimed() {
        let mut parts = parts(&[
            (USER_ID_HEADER, UserId::new().to_string()),
            (ROLE_HEADER, "system".to_string()),
        ]);
        let result = RequireActor::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthRejection(AuthError::UnknownRole(_)))));
    }

    #[tokio::test]
    async fn malformed_branch_is_rejected() {
        let mut parts = parts(&[
            (USER_ID_HEADER, UserId::new().to_string()),
            (ROLE_HEADER, "trainer".to_string()),
            (BRANCH_HEADER, "downtown".to_string()),
        ]);
        let result = RequireActor::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthRejection(AuthError::InvalidIdentity(_)))));
    }
}
