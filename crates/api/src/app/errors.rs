use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use cyclecount_core::DomainError;
use cyclecount_infra::{ServiceError, StoreError};

/// Error kinds surfaced over HTTP.
///
/// | Kind | Status | `code` |
/// |---|---|---|
/// | `Validation` | 400 | `validation_error` |
/// | `PayloadTooLarge` | 413 | `payload_too_large` |
/// | `StoreUnavailable` | 503 | `store_unavailable` |
/// | `Internal` | 500 | `internal_error` |
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    StoreUnavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            ApiError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            ApiError::StoreUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

/// Multipart failures are the caller's fault; the body limit gets its own kind.
impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(format!("upload exceeds the size limit: {}", err.body_text()))
        } else {
            ApiError::Validation(format!("invalid multipart body: {}", err.body_text()))
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(DomainError::Validation(msg)) => ApiError::Validation(msg),
            ServiceError::Ingest(e) => ApiError::Validation(e.to_string()),
            ServiceError::Store(StoreError::Unavailable(msg)) => ApiError::StoreUnavailable(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match self {
            ApiError::Validation(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::StoreUnavailable(msg)
            | ApiError::Internal(msg) => msg,
        };

        if status.is_server_error() {
            tracing::error!(%status, code, error = %message, "request failed");
        }
        json_error(status, code, message)
    }
}

/// `{"error": <message>, "code": <code>}`
pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
            "code": code,
        })),
    )
        .into_response()
}
