//! Core types and shared functionality for the advent lottery checker.
//!
//! This crate provides:
//! - Domain model for drawn days, prizes and check results
//! - Cache store abstraction with a SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod model;

pub use cache::{CacheDb, CacheEntry, CacheStore};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use model::{CheckResult, DailyData, DayInfo, DaysInfo, PrizeDetail, PrizeRecord, WinningDay};
