//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Deployment aliases (`UPSTASH_REDIS_REST_URL`, `UPSTASH_REDIS_REST_TOKEN`, `ADMIN_SECRET`)
//! 2. Environment variables (ADVENT_*)
//! 3. TOML config file (if ADVENT_CONFIG_FILE set)
//! 4. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Environment variables honoured without the `ADVENT_` prefix, with the field they fill.
const ENV_ALIASES: &[(&str, &str)] = &[
    ("UPSTASH_REDIS_REST_URL", "cache_url"),
    ("UPSTASH_REDIS_REST_TOKEN", "cache_token"),
    ("ADMIN_SECRET", "admin_secret"),
];

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Landing page of the advent calendar.
    ///
    /// Set via ADVENT_ORIGIN_URL environment variable.
    #[serde(default = "default_origin_url")]
    pub origin_url: String,

    /// User-Agent string for origin requests.
    ///
    /// Set via ADVENT_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in milliseconds.
    ///
    /// Set via ADVENT_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes read from a single origin response.
    ///
    /// Set via ADVENT_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// REST endpoint of the remote key-value cache.
    ///
    /// Set via ADVENT_CACHE_URL or UPSTASH_REDIS_REST_URL.
    #[serde(default)]
    pub cache_url: Option<String>,

    /// Bearer token for the remote key-value cache.
    ///
    /// Set via ADVENT_CACHE_TOKEN or UPSTASH_REDIS_REST_TOKEN.
    #[serde(default)]
    pub cache_token: Option<String>,

    /// Path to a local SQLite cache, used when no remote cache is configured.
    ///
    /// Set via ADVENT_CACHE_DB_PATH environment variable.
    #[serde(default)]
    pub cache_db_path: Option<PathBuf>,

    /// Shared secret guarding the admin endpoints.
    ///
    /// Set via ADVENT_ADMIN_SECRET or ADMIN_SECRET.
    #[serde(default)]
    pub admin_secret: Option<String>,

    /// Address the HTTP server binds to.
    ///
    /// Set via ADVENT_BIND_ADDR environment variable.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_origin_url() -> String {
    "https://adventskalender-vs.de/".into()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            origin_url: default_origin_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            cache_url: None,
            cache_token: None,
            cache_db_path: None,
            admin_secret: None,
            bind_addr: default_bind_addr(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment()
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("ADVENT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        let alias_names: Vec<&str> = ENV_ALIASES.iter().map(|(env, _)| *env).collect();

        figment
            .merge(
                Env::prefixed("ADVENT_").map(|key| key.as_str().to_lowercase().into()),
            )
            .merge(Env::raw().only(&alias_names).map(|key| {
                let upper = key.as_str().to_uppercase();
                ENV_ALIASES
                    .iter()
                    .find(|(env, _)| *env == upper)
                    .map(|(_, field)| (*field).into())
                    .unwrap_or_else(|| key.as_str().to_lowercase().into())
            }))
    }

    /// Remote cache credentials, only when both URL and token are present and non-empty.
    pub fn remote_cache(&self) -> Option<(&str, &str)> {
        match (self.cache_url.as_deref(), self.cache_token.as_deref()) {
            (Some(url), Some(token)) if !url.is_empty() && !token.is_empty() => Some((url, token)),
            _ => None,
        }
    }

    /// Admin secret required by the protected endpoints.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if no secret is configured.
    pub fn require_admin_secret(&self) -> Result<&str, ConfigError> {
        self.admin_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "admin_secret".into(),
                hint: "Set ADMIN_SECRET or ADVENT_ADMIN_SECRET environment variable".into(),
            })
    }
}
