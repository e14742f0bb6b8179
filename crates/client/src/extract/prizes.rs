//! Prize table extraction from `check_access` AJAX replies.
//!
//! The endpoint answers in one of three shapes: the literal `false` when the
//! day is not accessible, a JSON string wrapping an HTML fragment, or the
//! fragment itself. Decoding is explicit and happens before any HTML parsing.

use advent_core::PrizeRecord;
use scraper::{ElementRef, Html, Selector};

use crate::fetch::AjaxReply;

/// Result of decoding an AJAX reply body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Empty body or literal `false`: nothing to show for this day.
    Unavailable,
    /// Body was a JSON string literal; holds the decoded HTML.
    Decoded(String),
    /// Body used as HTML directly, with `\/` escapes undone.
    RawFragment(String),
}

impl Fragment {
    pub fn html(&self) -> Option<&str> {
        match self {
            Fragment::Unavailable => None,
            Fragment::Decoded(html) | Fragment::RawFragment(html) => Some(html),
        }
    }
}

/// Decode an AJAX reply body into an HTML fragment.
///
/// A body that looks like a JSON string is decoded with serde_json first; if
/// that fails the quotes and slash escapes are stripped literally.
pub fn decode_fragment(body: &str) -> Fragment {
    let text = body.trim();

    if text.is_empty() || text == "false" {
        return Fragment::Unavailable;
    }

    if text.starts_with('"') {
        return match serde_json::from_str::<String>(text) {
            Ok(html) => Fragment::Decoded(html),
            Err(_) => Fragment::RawFragment(text.trim_matches('"').replace("\\/", "/")),
        };
    }

    Fragment::RawFragment(text.replace("\\/", "/"))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse prize rows out of an HTML fragment.
///
/// The fragment is wrapped in a `<table>` root so bare `<tr>` rows parse the
/// same as a full table. Rows with fewer than four cells are ignored.
pub fn parse_prize_rows(fragment: &str) -> Vec<PrizeRecord> {
    let document = Html::parse_fragment(&format!("<table>{fragment}</table>"));
    let (Ok(row_sel), Ok(cell_sel)) = (Selector::parse("tr"), Selector::parse("td")) else {
        return Vec::new();
    };

    document
        .select(&row_sel)
        .filter_map(|row| {
            let cells: Vec<String> = row.select(&cell_sel).map(cell_text).collect();
            match cells.as_slice() {
                [number, prize, value, sponsor, ..] => Some(PrizeRecord {
                    number: number.clone(),
                    prize: prize.clone(),
                    value: value.clone(),
                    sponsor: sponsor.clone(),
                }),
                _ => None,
            }
        })
        .collect()
}

/// Extract the prize table from an AJAX reply.
///
/// Returns `None` for a non-200 status, an unavailable day, or a fragment
/// without any usable row.
pub fn extract_prizes(reply: &AjaxReply) -> Option<Vec<PrizeRecord>> {
    if reply.status != reqwest::StatusCode::OK {
        tracing::debug!(status = reply.status.as_u16(), "prize endpoint returned non-200");
        return None;
    }

    let fragment = decode_fragment(&reply.body);
    let prizes = parse_prize_rows(fragment.html()?);

    if prizes.is_empty() { None } else { Some(prizes) }
}
