//! Best-effort extraction from the calendar's markup.
//!
//! ### Landing page
//! - Every `div.unlocked-window` is one drawn day.
//! - Day label from `p.single-number`, falling back to the `window-<n>` class.
//! - Numbers from every `p.numbers` in the window.
//!
//! ### Prize replies
//! - Two-stage decode of the AJAX body (JSON string, then raw fragment).
//! - Rows with at least four cells become prize records.
//!
//! Nothing here guarantees the upstream markup stays stable; a changed page
//! simply yields fewer days or prizes.

pub mod days;
pub mod prizes;

pub use days::{ExtractedDays, extract_days};
pub use prizes::{Fragment, decode_fragment, extract_prizes, parse_prize_rows};
