//! Daily data fetching and number checking.
//!
//! A `Fetcher` owns the origin and the cache handle. Daily numbers are cached
//! for an hour under `advent_data`; prize tables for a day under
//! `prices_<window>`. A check runs its origin calls one after another.

pub mod checker;
pub mod fetcher;

pub use checker::{normalize_number, winning_days};
pub use fetcher::{Fetcher, PrimedDay};
