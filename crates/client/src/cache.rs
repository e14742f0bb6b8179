//! Process-wide cache handle injected into the data fetcher.
//!
//! The handle picks a backend from configuration, connects to it lazily on
//! first use and turns every backend failure into a miss or a dropped write.
//! Callers therefore never see cache errors; they only see `None`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use advent_core::{AppConfig, CacheDb, CacheEntry, CacheStore};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;

use crate::kv::{KvConfig, RestKvStore};

/// Which cache backend to connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackend {
    /// REST key-value service; needs both URL and token.
    Remote { url: String, token: String, timeout: Duration },
    /// Local SQLite file.
    Local(PathBuf),
    /// Always miss, drop writes.
    Disabled,
}

impl CacheBackend {
    /// Remote credentials win over a local path; neither means disabled.
    pub fn from_config(config: &AppConfig) -> Self {
        if let Some((url, token)) = config.remote_cache() {
            return CacheBackend::Remote { url: url.to_string(), token: token.to_string(), timeout: config.timeout() };
        }
        match &config.cache_db_path {
            Some(path) => CacheBackend::Local(path.clone()),
            None => CacheBackend::Disabled,
        }
    }
}

/// Lazily connected cache handle.
pub struct Cache {
    backend: CacheBackend,
    store: OnceCell<Option<Arc<dyn CacheStore>>>,
}

impl Cache {
    pub fn new(backend: CacheBackend) -> Self {
        Self { backend, store: OnceCell::new() }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(CacheBackend::from_config(config))
    }

    /// A handle that never caches.
    pub fn disabled() -> Self {
        Self::new(CacheBackend::Disabled)
    }

    /// A handle over an already connected store.
    pub fn with_store(store: Arc<dyn CacheStore>) -> Self {
        Self { backend: CacheBackend::Disabled, store: OnceCell::new_with(Some(Some(store))) }
    }

    async fn connect(backend: &CacheBackend) -> Option<Arc<dyn CacheStore>> {
        let connected: Result<Arc<dyn CacheStore>, advent_core::Error> = match backend {
            CacheBackend::Disabled => return None,
            CacheBackend::Remote { url, token, timeout } => {
                RestKvStore::new(KvConfig { url: url.clone(), token: token.clone(), timeout: *timeout })
                    .map(|store| Arc::new(store) as Arc<dyn CacheStore>)
                    .map_err(advent_core::Error::from)
            }
            CacheBackend::Local(path) => CacheDb::open(path)
                .await
                .map(|db| Arc::new(db) as Arc<dyn CacheStore>),
        };

        match connected {
            Ok(store) => {
                tracing::info!(backend = store.name(), "cache connected");
                Some(store)
            }
            Err(e) => {
                tracing::warn!(error = %e, "cache unavailable, continuing without it");
                None
            }
        }
    }

    /// The connected store, connecting on first call.
    ///
    /// Initialization runs at most once; a failed connection leaves the
    /// handle disabled for its lifetime.
    async fn store(&self) -> Option<&Arc<dyn CacheStore>> {
        self.store.get_or_init(|| Self::connect(&self.backend)).await.as_ref()
    }

    /// Name of the connected backend, or `"disabled"`.
    pub async fn backend_name(&self) -> &'static str {
        self.store().await.map(|s| s.name()).unwrap_or("disabled")
    }

    /// Read and decode a cached value. Any failure is a miss.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let store = self.store().await?;

        let payload = match store.get(key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "cached value is malformed, treating as miss");
                None
            }
        }
    }

    /// Metadata of a stored entry, if the backend keeps any.
    pub async fn entry(&self, key: &str) -> Option<CacheEntry> {
        let store = self.store().await?;
        match store.entry(key).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache entry lookup failed");
                None
            }
        }
    }

    /// Drop expired entries. Failures count as nothing purged.
    pub async fn purge_expired(&self) -> u64 {
        let Some(store) = self.store().await else {
            return 0;
        };
        match store.purge_expired().await {
            Ok(count) => {
                tracing::debug!(backend = store.name(), count, "purged expired cache entries");
                count
            }
            Err(e) => {
                tracing::warn!(error = %e, "cache purge failed");
                0
            }
        }
    }

    /// Encode and write a value. Returns whether the write went through.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl_secs: Option<u64>) -> bool {
        let Some(store) = self.store().await else {
            return false;
        };

        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to encode cache value");
                return false;
            }
        };

        match store.set(key, &payload, ttl_secs).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache write failed");
                false
            }
        }
    }
}
