//! Public number check endpoint.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;

/// Edge caches may serve a result for a minute and revalidate for five more.
pub const CHECK_CACHE_CONTROL: &str = "public, s-maxage=60, stale-while-revalidate=300";

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub number: Option<String>,
}

/// GET /api/check?number=<digits> - Check a ticket number.
///
/// A query string that does not deserialize, such as a repeated `number`,
/// counts as an invalid number.
pub async fn check_number(
    State(state): State<AppState>, query: Result<Query<CheckQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Ok(Query(query)) = query else {
        return Err(ApiError::InvalidNumber);
    };
    let number = query.number.ok_or(ApiError::InvalidNumber)?;
    let result = state.fetcher.check_number(&number).await?;

    Ok((
        [(header::CACHE_CONTROL, CHECK_CACHE_CONTROL), (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(result),
    ))
}
