//! Advent lottery checker HTTP server.
//!
//! # Endpoints
//!
//! - `GET /api/health` - Health check
//! - `GET /api/check?number=<digits>` - Check a ticket number
//! - `GET /api/cache-status` - Inspect the daily cache entry (admin)
//! - `GET /api/init-cache` - Force a fresh scrape into the cache (admin)
//! - `GET /api/init-prize-cache` - Refresh every day's prize table (admin)

use std::net::SocketAddr;
use std::sync::Arc;

use advent_client::{Cache, FetchClient, FetchConfig, Fetcher};
use advent_core::AppConfig;
use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod auth;
mod error;
mod routes;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Fetcher,
    pub config: Arc<AppConfig>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health::check))
        .route("/api/check", get(routes::check::check_number))
        .route("/api/cache-status", get(routes::admin::cache_status))
        .route("/api/init-cache", get(routes::admin::init_cache))
        .route("/api/init-prize-cache", get(routes::admin::init_prize_cache))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .json()
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let origin = FetchClient::new(FetchConfig::from(&config)).context("failed to build origin client")?;
    let cache = Cache::from_config(&config);
    let fetcher = Fetcher::new(Arc::new(origin), Arc::new(cache));

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.bind_addr))?;

    tracing::info!(
        origin = %config.origin_url,
        remote_cache = config.remote_cache().is_some(),
        admin = config.admin_secret.is_some(),
        "Starting advent-server"
    );

    let app = router(AppState { fetcher, config: Arc::new(config) });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
