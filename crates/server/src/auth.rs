//! Shared-secret check for the admin endpoints.
//!
//! The token may arrive as `Authorization: Bearer <secret>`, as an
//! `X-Admin-Token` header or as a `token` query parameter, checked in that
//! order. An unset secret rejects every request.

use advent_core::AppConfig;
use axum::http::{HeaderMap, header};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::ApiError;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Query string of the admin endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

fn non_empty(token: &str) -> Option<&str> {
    Some(token.trim()).filter(|t| !t.is_empty())
}

/// First non-empty token among bearer, admin header and query.
fn presented_token<'a>(headers: &'a HeaderMap, query: &'a TokenQuery) -> Option<&'a str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(non_empty);

    let admin_header = || {
        headers
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(non_empty)
    };

    bearer
        .or_else(admin_header)
        .or_else(|| query.token.as_deref().and_then(non_empty))
}

/// Compare SHA-256 digests so the comparison length is fixed.
fn token_matches(presented: &str, secret: &str) -> bool {
    Sha256::digest(presented.as_bytes()) == Sha256::digest(secret.as_bytes())
}

/// Reject the request unless it carries the configured admin secret.
pub fn authorize(config: &AppConfig, headers: &HeaderMap, query: &TokenQuery) -> Result<(), ApiError> {
    let secret = config.require_admin_secret().map_err(|e| {
        tracing::error!(error = %e, "admin endpoint called without a configured secret");
        ApiError::AuthNotConfigured
    })?;

    match presented_token(headers, query) {
        Some(token) if token_matches(token, secret) => Ok(()),
        _ => {
            tracing::warn!("admin request rejected");
            Err(ApiError::Unauthorized)
        }
    }
}
