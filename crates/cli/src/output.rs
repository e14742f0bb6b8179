//! Plain-text rendering of CLI results.

use std::fmt::Write;

use advent_client::PrimedDay;
use advent_core::{CacheEntry, CheckResult, DailyData, PrizeRecord};

pub fn check_result(result: &CheckResult) -> String {
    let mut out = String::new();

    if result.is_winner {
        let _ = writeln!(out, "{} won on day(s) {}", result.number, result.winning_days.join(", "));
        for prize in &result.prize_details {
            let _ = writeln!(out, "  day {}: {} ({}) from {}", prize.day, prize.prize, prize.value, prize.sponsor);
        }
    } else {
        let _ = writeln!(out, "{} has not won", result.number);
    }

    let _ = writeln!(
        out,
        "{} days drawn, {} winning numbers{}",
        result.total_days_drawn,
        result.total_winners,
        result.cached_at.as_deref().map(|c| format!(", data from {c}")).unwrap_or_default()
    );

    out
}

pub fn days(data: &DailyData) -> String {
    let mut out = String::new();
    for (day, info) in data.days_info.iter() {
        let _ = writeln!(
            out,
            "day {:>3} [{}]: {}",
            day,
            info.window_class.as_deref().unwrap_or("-"),
            info.numbers.join(" ")
        );
    }
    let _ = writeln!(out, "fetched at {}", data.cached_at);
    out
}

pub fn prizes(window: &str, prizes: &[PrizeRecord]) -> String {
    if prizes.is_empty() {
        return format!("no prizes available for {window}\n");
    }

    let mut out = String::new();
    for p in prizes {
        let _ = writeln!(out, "{:>6}  {} ({}) from {}", p.number, p.prize, p.value, p.sponsor);
    }
    out
}

pub fn init_cache(data: &DailyData, primed: &[PrimedDay], backend: &str) -> String {
    let mut out = format!(
        "cached {} days with {} numbers at {} ({backend})\n",
        data.days_info.len(),
        data.days_info.total_numbers(),
        data.cached_at
    );
    for day in primed {
        let _ = writeln!(
            out,
            "  day {} [{}]: {} prizes{}",
            day.day,
            day.window_class,
            day.prizes,
            if day.cached { "" } else { ", not cached" }
        );
    }
    out
}

pub fn status(data: Option<&DailyData>, entry: Option<&CacheEntry>, backend: &str) -> String {
    let mut out = match data {
        Some(data) => format!(
            "cache active ({backend}): {} days, {} numbers, cached at {}\n",
            data.days_info.len(),
            data.days_info.total_numbers(),
            data.cached_at
        ),
        None => format!("cache empty ({backend}), will fetch on next request\n"),
    };

    // Only the SQLite backend keeps entry metadata.
    if let Some(entry) = entry {
        let ttl = entry.ttl_seconds.map(|s| format!("{s}s")).unwrap_or_else(|| "none".into());
        let _ = writeln!(out, "  entry {} written {}, ttl {}", entry.key, entry.cached_at, ttl);
    }

    out
}
