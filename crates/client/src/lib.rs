//! Client code for the advent lottery checker.
//!
//! This crate provides the origin HTTP client, page and prize extraction, the
//! cache backends and handle, and the fetch/check logic shared by the server
//! and CLI.

pub mod cache;
pub mod extract;
pub mod fetch;
pub mod kv;
pub mod lottery;

pub use cache::{Cache, CacheBackend};
pub use extract::{ExtractedDays, Fragment, extract_days, extract_prizes};
pub use fetch::{AjaxReply, FetchClient, FetchConfig, Origin};
pub use kv::{KvConfig, KvError, RestKvStore};
pub use lottery::{Fetcher, PrimedDay, normalize_number, winning_days};
