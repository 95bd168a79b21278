//! API error handling
//!
//! Every failure is `{ "error": ..., "code": ... }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// Structured JSON error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// API error type that converts to JSON responses
#[derive(Debug)]
pub enum ApiError {
    /// Caller missing or not privileged
    Unauthorized(String),
    /// Resource not found
    NotFound(String),
    /// Bad form input
    Validation(String),
    /// Database error
    Database(String),
    /// Internal server error
    Internal(String),
}

impl From<common::Error> for ApiError {
    fn from(e: common::Error) -> Self {
        match e {
            common::Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            common::Error::NotFound(msg) => ApiError::NotFound(msg),
            common::Error::Validation(msg) => ApiError::Validation(msg),
            common::Error::Database(msg) => ApiError::Database(msg),
            common::Error::Config(msg) | common::Error::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, code) = match self {
            ApiError::Unauthorized(msg) => (
                StatusCode::FORBIDDEN,
                format!("Action not allowed: {}", msg),
                "unauthorized",
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "not_found"),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg, "validation_error"),
            ApiError::Database(msg) => {
                error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Database error: {}", msg),
                    "database_error",
                )
            }
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    "internal_error",
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// `{ "success": true }`
#[derive(Serialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn rendered(err: common::Error) -> (StatusCode, serde_json::Value) {
        let response = ApiError::from(err).into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_domain_errors_map_to_status_and_code() {
        let cases = [
            (
                common::Error::Unauthorized("x".into()),
                StatusCode::FORBIDDEN,
                "unauthorized",
            ),
            (
                common::Error::NotFound("x".into()),
                StatusCode::NOT_FOUND,
                "not_found",
            ),
            (
                common::Error::Validation("x".into()),
                StatusCode::BAD_REQUEST,
                "validation_error",
            ),
            (
                common::Error::Database("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
            ),
            (
                common::Error::Config("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
            ),
        ];

        for (err, status, code) in cases {
            let (got_status, body) = rendered(err).await;
            assert_eq!(got_status, status);
            assert_eq!(body["code"], code);
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_internal_message_is_hidden() {
        let (_, body) = rendered(common::Error::Database("deadlock".into())).await;
        assert_eq!(body["error"], "Database error: deadlock");

        let (_, body) = rendered(common::Error::Internal("secret detail".into())).await;
        assert_eq!(body["error"], "Internal server error");
    }
}
