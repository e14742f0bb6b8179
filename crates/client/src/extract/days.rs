//! Unlocked-window extraction from the calendar landing page.

use advent_core::{DayInfo, DaysInfo, Error};
use scraper::{ElementRef, Html, Selector};

/// Class prefix carrying the day number of a window.
const WINDOW_CLASS_PREFIX: &str = "window-";

/// Days drawn so far, as found on the landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedDays {
    /// Every drawn number in page order, duplicates included.
    pub winning_numbers: Vec<String>,
    pub days_info: DaysInfo,
}

fn selector(css: &str) -> Result<Selector, Error> {
    Selector::parse(css).map_err(|e| Error::ParseFailed(format!("invalid selector '{css}': {e}")))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Day number from the window's `window-<n>` class.
fn window_suffix(window: ElementRef<'_>) -> Option<String> {
    window
        .value()
        .classes()
        .find_map(|class| class.strip_prefix(WINDOW_CLASS_PREFIX))
        .map(str::to_string)
}

/// Extract the unlocked days and their numbers from the landing page HTML.
///
/// Windows yielding no numbers are skipped, as are windows with neither a
/// `p.single-number` label nor a `window-<n>` class.
pub fn extract_days(html: &str) -> Result<ExtractedDays, Error> {
    if html.trim().is_empty() {
        return Err(Error::ParseFailed("empty document".into()));
    }

    let document = Html::parse_document(html);
    let window_sel = selector("div.unlocked-window")?;
    let label_sel = selector("p.single-number")?;
    let numbers_sel = selector("p.numbers")?;

    let mut extracted = ExtractedDays::default();

    for window in document.select(&window_sel) {
        let suffix = window_suffix(window);

        let label = window
            .select(&label_sel)
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty())
            .or_else(|| suffix.clone());

        let Some(label) = label else {
            tracing::debug!("skipping unlocked window without label or window class");
            continue;
        };

        let numbers: Vec<String> = window
            .select(&numbers_sel)
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect();

        if numbers.is_empty() {
            continue;
        }

        extracted.winning_numbers.extend(numbers.iter().cloned());
        extracted.days_info.insert(
            label,
            DayInfo { numbers, window_class: suffix.map(|s| format!("{WINDOW_CLASS_PREFIX}{s}")) },
        );
    }

    Ok(extracted)
}
