//! Error handling for the API server.
//!
//! A unified error type that maps to HTTP responses. All handlers
//! return `Result<T, ApiError>`, which converts to an appropriate
//! status code with a JSON body:
//!
//! ```json
//! { "error": "not_found", "message": "Product not found: p-123" }
//! ```
//!
//! The boundary pattern is uniform: domain errors bubble up via `?`,
//! are logged once here, and leave as a generic 4xx/5xx - no retry or
//! partial-failure recovery inside handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use whiz_core::error::{CoreError, ValidationError};
use whiz_db::DbError;
use whiz_docs::DocError;

/// API result type alias.
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Unauthorized (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Forbidden (403)
    #[error("{0}")]
    Forbidden(String),

    /// Not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Conflict (409) - e.g., duplicate email or fingerprint
    #[error("{0}")]
    Conflict(String),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),

    /// Service unavailable (503) - e.g., M-Pesa not configured
    #[error("{0}")]
    ServiceUnavailable(String),
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            ApiError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.to_string();

        // Log once, at the boundary
        if status.is_server_error() {
            error!(status = %status, error = code, %message, "Request failed");
        } else {
            warn!(status = %status, error = code, %message, "Request rejected");
        }

        let body = Json(ErrorResponse {
            error: code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

// =============================================================================
// Domain Error Conversions
// =============================================================================

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. } => ApiError::Conflict(err.to_string()),
            // Stock guard and state-transition failures are caller errors
            DbError::TransactionFailed(_) => ApiError::BadRequest(err.to_string()),
            DbError::ForeignKeyViolation { .. } => ApiError::BadRequest(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(_) | CoreError::TransactionNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            CoreError::Validation(_)
            | CoreError::InsufficientStock { .. }
            | CoreError::EmptyTransaction
            | CoreError::InvalidPaymentAmount { .. }
            | CoreError::InvalidTransactionStatus { .. } => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<DocError> for ApiError {
    fn from(err: DocError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Internal(format!("Upstream request failed: {err}"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_mapping() {
        let err: ApiError = DbError::not_found("Product", "p-1").into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = DbError::duplicate("email", "a@b.co").into();
        assert!(matches!(err, ApiError::Conflict(_)));

        let err: ApiError = DbError::TransactionFailed("not enough stock".into()).into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err: ApiError = ValidationError::Required {
            field: "name".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
