//! API error types.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("Invalid archive format")]
    InvalidFormat,

    #[error("upload quota exceeded: at most {max} files per client")]
    QuotaExceeded { max: u64 },

    #[error("internal error: {0}")]
    Internal(String),

    #[error("multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("archive error: {0}")]
    Archive(#[from] baler_archive::ArchiveError),

    #[error("core error: {0}")]
    Core(#[from] baler_core::Error),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::InvalidFormat => "invalid_format",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::Internal(_) => "internal_error",
            Self::Multipart(_) => "multipart_error",
            Self::Archive(_) => "archive_error",
            Self::Core(_) => "core_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidFormat => StatusCode::BAD_REQUEST,
            Self::QuotaExceeded { .. } => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Multipart(_) => StatusCode::BAD_REQUEST,
            Self::Archive(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Core(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_message_names_the_maximum() {
        let err = ApiError::QuotaExceeded { max: 5 };
        assert!(err.to_string().contains('5'));
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn invalid_format_is_a_client_error_with_fixed_message() {
        let err = ApiError::InvalidFormat;
        assert_eq!(err.to_string(), "Invalid archive format");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn archive_failures_are_server_errors() {
        let io = std::io::Error::other("disk gone");
        let err = ApiError::Archive(baler_archive::ArchiveError::Io(io));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "archive_error");
    }
}
