//! JSON error bodies and the mapping from engine errors to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::foundation::{ErrorCode, ValidationError};
use crate::domain::membership::MembershipError;

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Set when the caller may safely repeat the request.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }
}

/// API error type that converts engine errors to HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub MembershipError);

impl From<MembershipError> for ApiError {
    fn from(err: MembershipError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            MembershipError::NotFound { .. } => StatusCode::NOT_FOUND,
            MembershipError::AlreadyOpen(_)
            | MembershipError::InvalidState { .. }
            | MembershipError::ConcurrentDebit(_) => StatusCode::CONFLICT,
            MembershipError::ValidationFailed { code, .. } => match code {
                ErrorCode::DuplicatePlanName | ErrorCode::CommissionAlreadyPaid => {
                    StatusCode::CONFLICT
                }
                _ => StatusCode::BAD_REQUEST,
            },
            MembershipError::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
            MembershipError::Forbidden(_) => StatusCode::FORBIDDEN,
            MembershipError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
            let body = ErrorResponse::new(self.0.code().to_string(), "Internal server error");
            return (status, Json(body)).into_response();
        }

        let mut body = ErrorResponse::new(self.0.code().to_string(), self.0.message());
        body.retryable = self.0.is_retryable();
        match &self.0 {
            MembershipError::InsufficientFunds {
                required,
                available,
            } => {
                body.details = Some(serde_json::json!({
                    "required": required,
                    "available": available,
                }));
            }
            MembershipError::ValidationFailed { field, .. } => {
                body.details = Some(serde_json::json!({ "field": field }));
            }
            _ => {}
        }
        (status, Json(body)).into_response()
    }
}

/// Parses an identifier taken from the request path.
pub fn parse_path_id<T: std::str::FromStr>(raw: &str, field: &str) -> Result<T, ApiError> {
    raw.parse::<T>().map_err(|_| {
        ApiError(MembershipError::validation(
            field,
            format!("'{}' is not a valid identifier", raw),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{CommissionId, MembershipId, Money, UserId};

    #[test]
    fn engine_errors_map_to_statuses() {
        let cases = [
            (MembershipError::not_found(MembershipId::new()), StatusCode::NOT_FOUND),
            (MembershipError::already_open(UserId::new()), StatusCode::CONFLICT),
            (MembershipError::concurrent_debit(UserId::new()), StatusCode::CONFLICT),
            (MembershipError::invalid_state("active", "confirm"), StatusCode::CONFLICT),
            (MembershipError::validation("amount", "bad"), StatusCode::BAD_REQUEST),
            (
                MembershipError::insufficient_funds(Money::from_units(10), Money::ZERO),
                StatusCode::BAD_REQUEST,
            ),
            (MembershipError::duplicate_plan_name("Gold"), StatusCode::CONFLICT),
            (
                MembershipError::commission_already_paid(CommissionId::new()),
                StatusCode::CONFLICT,
            ),
            (MembershipError::forbidden("nope"), StatusCode::FORBIDDEN),
            (
                MembershipError::infrastructure("db down"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }

    #[test]
    fn bad_path_id_is_validation_error() {
        let err = parse_path_id::<MembershipId>("not-a-uuid", "membership_id").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.0.code(), ErrorCode::ValidationFailed);
    }
}
