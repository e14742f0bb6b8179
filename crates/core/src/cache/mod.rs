//! Key/value cache stores with TTL.
//!
//! This module defines the `CacheStore` trait used by the data fetcher and a
//! SQLite implementation for local runs. It supports:
//!
//! - Raw JSON text payloads, so callers decide how to decode them
//! - Per-entry TTL; expired entries read as misses
//! - Automatic schema migrations and WAL mode for the SQLite backend
//!
//! Backends report failures as typed errors. Deciding that a failure is just
//! a miss is the caller's policy, not the store's.

pub mod connection;
pub mod entries;
pub mod migrations;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use crate::Error;

pub use connection::CacheDb;

/// TTL of the daily numbers entry.
pub const DAILY_CACHE_TTL_SECS: u64 = 3_600;

/// TTL of a per-day prize table entry.
pub const PRIZE_CACHE_TTL_SECS: u64 = 86_400;

/// Cache key of the daily numbers.
pub const DAILY_CACHE_KEY: &str = "advent_data";

/// Cache key of one day's prize table.
pub fn prize_cache_key(window_class: &str) -> String {
    format!("prices_{window_class}")
}

/// A stored cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    /// JSON text of the cached value.
    pub payload: String,
    pub cached_at: String,
    /// `None` means the entry never expires.
    pub ttl_seconds: Option<i64>,
}

/// Key/value store with per-entry TTL.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read a fresh entry's payload. Expired or absent keys are `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Write a payload, replacing any existing entry.
    async fn set(&self, key: &str, payload: &str, ttl_secs: Option<u64>) -> Result<(), Error>;

    /// Human-readable backend name for logs.
    fn name(&self) -> &'static str;

    /// Stored entry with its metadata, fresh or not.
    ///
    /// Backends that keep no metadata report `Ok(None)`.
    async fn entry(&self, _key: &str) -> Result<Option<CacheEntry>, Error> {
        Ok(None)
    }

    /// Delete expired entries and return how many were removed.
    ///
    /// Backends that expire keys on their own report 0.
    async fn purge_expired(&self) -> Result<u64, Error> {
        Ok(0)
    }
}
