//! Cache-aside access to the daily numbers and per-day prize tables.

use std::sync::Arc;

use advent_core::cache::{DAILY_CACHE_KEY, DAILY_CACHE_TTL_SECS, PRIZE_CACHE_TTL_SECS, prize_cache_key};
use advent_core::{DailyData, PrizeRecord};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::time::Instant;

use crate::cache::Cache;
use crate::extract::{extract_days, extract_prizes};
use crate::fetch::Origin;

/// Outcome of priming one day's prize cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimedDay {
    pub day: String,
    pub window_class: String,
    pub prizes: usize,
    pub cached: bool,
}

/// Reads calendar data through the cache, falling back to the origin.
#[derive(Clone)]
pub struct Fetcher {
    origin: Arc<dyn Origin>,
    cache: Arc<Cache>,
}

impl Fetcher {
    pub fn new(origin: Arc<dyn Origin>, cache: Arc<Cache>) -> Self {
        Self { origin, cache }
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Daily data as currently cached, without touching the origin.
    pub async fn cached_daily_data(&self) -> Option<DailyData> {
        self.cache.get_json(DAILY_CACHE_KEY).await
    }

    /// Daily numbers, from cache unless `force_refresh`.
    ///
    /// `None` means the origin could not be fetched or parsed. A stale entry
    /// is never served in that case since it has already expired.
    pub async fn fetch_daily_data(&self, force_refresh: bool) -> Option<DailyData> {
        if !force_refresh && let Some(data) = self.cached_daily_data().await {
            tracing::debug!(days = data.days_info.len(), "cache hit for {}", DAILY_CACHE_KEY);
            return Some(data);
        }

        tracing::debug!(force_refresh, "cache miss for {}, fetching origin", DAILY_CACHE_KEY);
        let start = Instant::now();

        let extracted = match self.origin.landing_page().await.and_then(|html| extract_days(&html)) {
            Ok(extracted) => extracted,
            Err(e) => {
                tracing::warn!(error = %e, "daily data unavailable");
                return None;
            }
        };

        let data = DailyData {
            winning_numbers: extracted.winning_numbers,
            days_info: extracted.days_info,
            cached_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        tracing::debug!(
            days = data.days_info.len(),
            numbers = data.winning_numbers.len(),
            "scraped daily data in {}ms",
            start.elapsed().as_millis()
        );

        self.cache.set_json(DAILY_CACHE_KEY, &data, Some(DAILY_CACHE_TTL_SECS)).await;

        Some(data)
    }

    /// Prize table for one window, from cache unless `force_refresh`.
    ///
    /// Only non-empty tables are written back. Transport failures are logged
    /// and read as "no prizes".
    pub async fn fetch_prize_data(&self, window_class: &str, force_refresh: bool) -> Option<Vec<PrizeRecord>> {
        let key = prize_cache_key(window_class);

        if !force_refresh && let Some(prizes) = self.cache.get_json::<Vec<PrizeRecord>>(&key).await {
            tracing::debug!(window = window_class, "cache hit for {}", key);
            return Some(prizes);
        }

        let reply = match self.origin.check_access(window_class).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(window = window_class, error = %e, "prize lookup failed");
                return None;
            }
        };

        let prizes = extract_prizes(&reply)?;
        self.cache.set_json(&key, &prizes, Some(PRIZE_CACHE_TTL_SECS)).await;

        Some(prizes)
    }

    /// Force-refresh the prize cache of every day in `data` that has a window token.
    pub async fn prime_prizes(&self, data: &DailyData) -> Vec<PrimedDay> {
        let mut results = Vec::new();

        for (day, info) in data.days_info.iter() {
            let Some(window_class) = info.window_class.as_deref() else {
                continue;
            };

            let prizes = self
                .fetch_prize_data(window_class, true)
                .await
                .map(|p| p.len())
                .unwrap_or(0);

            results.push(PrimedDay {
                day: day.to_string(),
                window_class: window_class.to_string(),
                prizes,
                cached: prizes > 0,
            });
        }

        results
    }
}
