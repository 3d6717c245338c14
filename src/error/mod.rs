//! HTTP-facing error type
//!
//! Every layer's error converges on [`ApiError`], which renders as
//! `{ "error": { "code": ..., "message": ... } }` with a matching status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::{AuthError, JwtError};
use crate::store::StoreError;

/// Message shown to clients in place of server-side detail
const INTERNAL_MESSAGE: &str = "an internal error occurred";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetails<'a>,
}

#[derive(Serialize)]
struct ErrorDetails<'a> {
    code: &'static str,
    message: &'a str,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            ApiError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            ApiError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    pub fn error_code(&self) -> &'static str {
        self.parts().1
    }

    pub fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    /// Whether the detail stays in the server log
    fn is_opaque(&self) -> bool {
        matches!(self, ApiError::InternalError(_) | ApiError::DatabaseError(_))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();

        if status.is_server_error() {
            tracing::error!(error = %self, code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code, "Client error occurred");
        }

        let detail = self.to_string();
        let message = if self.is_opaque() {
            INTERNAL_MESSAGE
        } else {
            detail.as_str()
        };

        let body = ErrorBody {
            error: ErrorDetails { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(msg) => ApiError::Conflict(msg),
            StoreError::Timeout(_) => ApiError::ServiceUnavailable(err.to_string()),
            StoreError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(msg) => ApiError::ValidationError(msg),
            AuthError::DuplicateAccount => ApiError::Conflict(err.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::AccountNotFound => ApiError::NotFound(err.to_string()),
            AuthError::Hashing(_) | AuthError::Token(_) => ApiError::InternalError(err.to_string()),
            AuthError::Store(store) => store.into(),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::EncodingFailed(_) => ApiError::InternalError(err.to_string()),
            // Which check failed is not disclosed
            JwtError::TokenExpired | JwtError::InvalidSignature | JwtError::Malformed(_) => {
                ApiError::Unauthorized("invalid or expired token".to_string())
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use std::time::Duration;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_validation_and_bad_request_share_status() {
        let validation = ApiError::ValidationError("name is required".to_string());
        let bad = ApiError::BadRequest("no fields".to_string());

        assert_eq!(validation.status_code(), bad.status_code());
        assert_ne!(validation.error_code(), bad.error_code());
    }

    #[tokio::test]
    async fn test_client_error_body_carries_detail() {
        let (status, body) = render(ApiError::Forbidden("Admin access required".to_string())).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "FORBIDDEN");
        assert_eq!(body["error"]["message"], "Forbidden: Admin access required");
    }

    #[tokio::test]
    async fn test_server_error_body_hides_detail() {
        let (status, body) =
            render(ApiError::DatabaseError("relation \"accounts\" does not exist".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "DATABASE_ERROR");
        assert_eq!(body["error"]["message"], INTERNAL_MESSAGE);
    }

    #[test]
    fn test_auth_error_mapping() {
        let err: ApiError = AuthError::InvalidCredentials.into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert!(err.to_string().contains("email or password not matched"));

        let err: ApiError = AuthError::DuplicateAccount.into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err: ApiError = AuthError::Hashing("entropy".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_store_error_mapping() {
        let err: ApiError = StoreError::Timeout(Duration::from_secs(100)).into();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let err: ApiError = StoreError::Database("connection refused".to_string()).into();
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_token_failures_are_indistinguishable() {
        let expired: ApiError = JwtError::TokenExpired.into();
        let forged: ApiError = JwtError::InvalidSignature.into();
        assert_eq!(expired.to_string(), forged.to_string());
    }
}
