//! REST key-value client error types.

use std::sync::Arc;

/// Errors from the REST key-value cache client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KvError {
    /// URL or token not configured.
    #[error("missing credentials: cache URL and token are both required")]
    MissingCredentials,

    /// Authentication failed (invalid token).
    #[error("authentication failed: invalid token")]
    AuthError,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// The service answered with an error reply.
    #[error("command failed: {0}")]
    Command(String),

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for KvError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { KvError::Timeout } else { KvError::Network(Arc::new(err)) }
    }
}

impl From<KvError> for advent_core::Error {
    fn from(err: KvError) -> Self {
        advent_core::Error::CacheUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KvError::MissingCredentials;
        assert!(err.to_string().contains("credentials"));

        let err = KvError::HttpError { status: 502 };
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_into_core_error() {
        let err: advent_core::Error = KvError::AuthError.into();
        assert!(matches!(err, advent_core::Error::CacheUnavailable(_)));
    }
}
