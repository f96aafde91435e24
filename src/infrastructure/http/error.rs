//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const UNSUPPORTED_MEDIA_TYPE: i32 = 415;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const BAD_GATEWAY: i32 = 502;
    pub const SERVICE_UNAVAILABLE: i32 = 503;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    UnsupportedMedia(String),
    Internal(String),
    SynthesisFailed(String),
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn errno(&self) -> i32 {
        match self {
            ApiError::NotFound(_) => errno::NOT_FOUND,
            ApiError::BadRequest(_) => errno::BAD_REQUEST,
            ApiError::UnsupportedMedia(_) => errno::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Internal(_) => errno::INTERNAL_ERROR,
            ApiError::SynthesisFailed(_) => errno::BAD_GATEWAY,
            ApiError::ServiceUnavailable(_) => errno::SERVICE_UNAVAILABLE,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::UnsupportedMedia(msg)
            | ApiError::Internal(msg)
            | ApiError::SynthesisFailed(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let errno = self.errno();
        let msg = self.message();

        match &self {
            ApiError::NotFound(_) => {
                tracing::warn!(errno, error = %msg, "Resource not found")
            }
            ApiError::BadRequest(_) => tracing::warn!(errno, error = %msg, "Bad request"),
            ApiError::UnsupportedMedia(_) => {
                tracing::warn!(errno, error = %msg, "Unsupported media")
            }
            ApiError::Internal(_) => {
                tracing::error!(errno, error = %msg, "Internal server error")
            }
            ApiError::SynthesisFailed(_) => {
                tracing::error!(errno, error = %msg, "Synthesis failed")
            }
            ApiError::ServiceUnavailable(_) => {
                tracing::error!(errno, error = %msg, "Service unavailable")
            }
        }

        // 业务错误统一返回 HTTP 200，错误码在 errno 中
        (StatusCode::OK, Json(ErrorResponse::new(errno, msg))).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::EmptyInput(msg) => ApiError::BadRequest(msg),
            ApplicationError::FormatError(msg) => ApiError::UnsupportedMedia(msg),
            ApplicationError::SynthesisError(msg) => ApiError::SynthesisFailed(msg),
            ApplicationError::ExternalServiceError(msg) => ApiError::ServiceUnavailable(msg),
            ApplicationError::StorageError(msg) => ApiError::Internal(msg),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_error_mapping() {
        let cases = [
            (ApplicationError::not_found("Voice", "bob"), errno::NOT_FOUND),
            (ApplicationError::validation("bad"), errno::BAD_REQUEST),
            (ApplicationError::FormatError("x".into()), errno::UNSUPPORTED_MEDIA_TYPE),
            (ApplicationError::SynthesisError("x".into()), errno::BAD_GATEWAY),
            (ApplicationError::ExternalServiceError("x".into()), errno::SERVICE_UNAVAILABLE),
            (ApplicationError::StorageError("x".into()), errno::INTERNAL_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).errno(), expected);
        }
    }

    #[test]
    fn test_not_found_message() {
        let err = ApiError::from(ApplicationError::not_found("Voice", "bob"));
        assert_eq!(err.message(), "Voice not found: bob");
    }
}
