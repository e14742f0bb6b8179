//! Unified error types for the advent lottery checker.

use tokio_rusqlite::rusqlite;

/// Unified error types shared by the client, server and CLI.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., a non-numeric ticket number).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The origin site could not be reached or answered with an error.
    #[error("ORIGIN_UNAVAILABLE: {0}")]
    OriginUnavailable(String),

    /// HTTP error response from the origin.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Origin markup could not be parsed.
    #[error("PARSE_FAILED: {0}")]
    ParseFailed(String),

    /// Remote cache service failed or returned garbage.
    #[error("CACHE_UNAVAILABLE: {0}")]
    CacheUnavailable(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Admin token missing or wrong.
    #[error("UNAUTHORIZED")]
    Unauthorized,

    /// Admin secret not configured on this server.
    #[error("AUTH_NOT_CONFIGURED")]
    AuthNotConfigured,
}

impl Error {
    /// Whether the error means the origin data is unavailable.
    ///
    /// Fetch, HTTP and parse failures all collapse into this one signal.
    pub fn is_origin_failure(&self) -> bool {
        matches!(self, Error::OriginUnavailable(_) | Error::HttpError(_) | Error::ParseFailed(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
