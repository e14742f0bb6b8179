//! HTTP error mapping for the API.
//!
//! Every error body is `{"error": "<message>"}`. Origin details are logged,
//! never returned.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// API error types.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid number")]
    InvalidNumber,

    #[error("Could not fetch data")]
    FetchFailed,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Admin secret not configured")]
    AuthNotConfigured,

    #[error("Internal server error")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidNumber => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::FetchFailed | ApiError::AuthNotConfigured | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(detail = %detail, "request failed");
        }

        let status = self.status();
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

impl From<advent_core::Error> for ApiError {
    fn from(err: advent_core::Error) -> Self {
        use advent_core::Error;

        match err {
            Error::InvalidInput(_) => ApiError::InvalidNumber,
            Error::Unauthorized => ApiError::Unauthorized,
            Error::AuthNotConfigured => ApiError::AuthNotConfigured,
            e if e.is_origin_failure() => {
                tracing::warn!(error = %e, "origin failure");
                ApiError::FetchFailed
            }
            e => ApiError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advent_core::Error;

    #[test]
    fn test_core_error_mapping() {
        assert!(matches!(ApiError::from(Error::InvalidInput("x".into())), ApiError::InvalidNumber));
        assert!(matches!(ApiError::from(Error::HttpError("status 503".into())), ApiError::FetchFailed));
        assert!(matches!(ApiError::from(Error::ParseFailed("empty".into())), ApiError::FetchFailed));
        assert!(matches!(ApiError::from(Error::AuthNotConfigured), ApiError::AuthNotConfigured));
        assert!(matches!(ApiError::from(Error::CacheUnavailable("down".into())), ApiError::Internal(_)));
    }

    #[test]
    fn test_messages_do_not_leak_detail() {
        assert_eq!(ApiError::Internal("disk on fire".into()).to_string(), "Internal server error");
        assert_eq!(ApiError::FetchFailed.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::InvalidNumber.status(), StatusCode::BAD_REQUEST);
    }
}
