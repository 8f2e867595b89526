//! Response handling and error mapping.
//!
//! # Responsibilities
//! - Map domain errors to HTTP status codes
//! - Render every error, from either surface, in one JSON envelope
//!
//! # Design Decisions
//! - Envelope is `{"error": "<description>"}` for gateway and service alike
//! - Forwarding failures surface their description verbatim as a 500

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::employees::model::ValidationErrors;
use crate::employees::store::StoreError;
use crate::http::forward::ForwardError;

/// API error type that implements `IntoResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request body or parameters.
    #[error("{0}")]
    BadRequest(String),

    /// The requested resource was not found.
    #[error("{0}")]
    NotFound(String),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse<'a> {
    error: &'a str,
}

impl ApiError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        (status, Json(ErrorResponse { error: &message })).into_response()
    }
}

impl From<ForwardError> for ApiError {
    fn from(err: ForwardError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound("Employee not found".to_string()),
            StoreError::UnknownField(_) | StoreError::InvalidValue { .. } => {
                Self::BadRequest(err.to_string())
            }
            StoreError::Seed(_) | StoreError::IdsExhausted(_) => {
                tracing::error!(error = %err, "Store error");
                Self::Internal("Failed to access employee store".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_errors_map_to_status() {
        let not_found: ApiError = StoreError::NotFound(7).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "Employee not found");

        let unknown: ApiError = StoreError::UnknownField("salary".into()).into();
        assert_eq!(unknown.status_code(), StatusCode::BAD_REQUEST);

        let exhausted: ApiError = StoreError::IdsExhausted(i64::MAX).into();
        assert_eq!(exhausted.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn forward_errors_are_internal_with_description() {
        let err: ApiError = ForwardError::InvalidMethod("B A D".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("B A D"));
    }

    #[tokio::test]
    async fn renders_json_envelope() {
        let response = ApiError::NotFound("Employee not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Employee not found" }));
    }
}
