//! Protected cache administration endpoints.

use advent_client::PrimedDay;
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::HeaderMap,
};
use serde::Serialize;

use crate::AppState;
use crate::auth::{TokenQuery, authorize};
use crate::error::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatusResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_in_cache: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winners_in_cache: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitCacheResponse {
    pub status: &'static str,
    pub cached_at: String,
    pub days_cached: usize,
    pub winners_cached: usize,
}

#[derive(Debug, Serialize)]
pub struct InitPrizeCacheResponse {
    pub status: &'static str,
    pub results: Vec<PrimedDay>,
}

/// An unparsable query string carries no token.
fn token_query(query: Result<Query<TokenQuery>, QueryRejection>) -> TokenQuery {
    query.map(|Query(q)| q).unwrap_or_default()
}

/// GET /api/cache-status - Report the cached daily entry without fetching.
pub async fn cache_status(
    State(state): State<AppState>, headers: HeaderMap, query: Result<Query<TokenQuery>, QueryRejection>,
) -> Result<Json<CacheStatusResponse>, ApiError> {
    authorize(&state.config, &headers, &token_query(query))?;

    let response = match state.fetcher.cached_daily_data().await {
        Some(data) => CacheStatusResponse {
            status: "Cache active",
            cached_at: Some(data.cached_at),
            days_in_cache: Some(data.days_info.len()),
            winners_in_cache: Some(data.days_info.total_numbers()),
        },
        None => CacheStatusResponse {
            status: "Cache empty - will fetch on next request",
            cached_at: None,
            days_in_cache: None,
            winners_in_cache: None,
        },
    };

    Ok(Json(response))
}

/// GET /api/init-cache - Scrape the origin now and overwrite the cache.
pub async fn init_cache(
    State(state): State<AppState>, headers: HeaderMap, query: Result<Query<TokenQuery>, QueryRejection>,
) -> Result<Json<InitCacheResponse>, ApiError> {
    authorize(&state.config, &headers, &token_query(query))?;

    let data = state.fetcher.fetch_daily_data(true).await.ok_or(ApiError::FetchFailed)?;

    tracing::info!(days = data.days_info.len(), "daily cache initialized");

    Ok(Json(InitCacheResponse {
        status: "Cache initialized",
        days_cached: data.days_info.len(),
        winners_cached: data.days_info.total_numbers(),
        cached_at: data.cached_at,
    }))
}

/// GET /api/init-prize-cache - Refresh the prize table of every known day.
pub async fn init_prize_cache(
    State(state): State<AppState>, headers: HeaderMap, query: Result<Query<TokenQuery>, QueryRejection>,
) -> Result<Json<InitPrizeCacheResponse>, ApiError> {
    authorize(&state.config, &headers, &token_query(query))?;

    let data = state.fetcher.fetch_daily_data(false).await.ok_or(ApiError::FetchFailed)?;
    let results = state.fetcher.prime_prizes(&data).await;

    tracing::info!(
        days = results.len(),
        cached = results.iter().filter(|r| r.cached).count(),
        "prize cache initialized"
    );

    Ok(Json(InitPrizeCacheResponse { status: "Prize cache initialized", results }))
}
