//! Matching a ticket number against the drawn days.

use advent_core::{CheckResult, DaysInfo, Error, PrizeDetail, WinningDay};

use super::fetcher::Fetcher;

/// Canonical form of a ticket number: ASCII digits without leading zeros.
///
/// `"007"` becomes `"7"` and `"000"` becomes `"0"`. Empty input and any
/// non-digit character, whitespace included, is rejected.
pub fn normalize_number(raw: &str) -> Result<String, Error> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidInput("Invalid number".into()));
    }

    let stripped = raw.trim_start_matches('0');
    Ok(if stripped.is_empty() { "0".to_string() } else { stripped.to_string() })
}

fn same_number(drawn: &str, number: &str) -> bool {
    normalize_number(drawn).is_ok_and(|n| n == number)
}

/// Days on which `number` was drawn, in page order.
///
/// `number` must already be normalized. Drawn numbers are normalized the
/// same way before comparing.
pub fn winning_days(number: &str, days_info: &DaysInfo) -> Vec<WinningDay> {
    days_info
        .iter()
        .filter(|(_, info)| info.numbers.iter().any(|drawn| same_number(drawn, number)))
        .map(|(day, info)| WinningDay { day: day.to_string(), window_class: info.window_class.clone() })
        .collect()
}

impl Fetcher {
    /// Winning days of `number` and the prizes it won on them.
    ///
    /// Prize tables are fetched one winning day at a time. A day whose table
    /// is unavailable contributes no prize detail.
    pub async fn check(&self, number: &str, days_info: &DaysInfo) -> (Vec<WinningDay>, Vec<PrizeDetail>) {
        let winners = winning_days(number, days_info);
        let mut prize_details = Vec::new();

        for winner in &winners {
            let Some(window_class) = winner.window_class.as_deref().filter(|w| !w.is_empty()) else {
                continue;
            };

            let Some(prizes) = self.fetch_prize_data(window_class, false).await else {
                continue;
            };

            prize_details.extend(
                prizes
                    .into_iter()
                    .filter(|p| same_number(&p.number, number))
                    .map(|p| PrizeDetail { day: winner.day.clone(), prize: p.prize, value: p.value, sponsor: p.sponsor }),
            );
        }

        (winners, prize_details)
    }

    /// Full check of a raw ticket number.
    ///
    /// Fails with `InvalidInput` for a malformed number and with
    /// `OriginUnavailable` when no daily data can be obtained.
    pub async fn check_number(&self, raw: &str) -> Result<CheckResult, Error> {
        let number = normalize_number(raw)?;

        let data = self
            .fetch_daily_data(false)
            .await
            .ok_or_else(|| Error::OriginUnavailable("Could not fetch data".into()))?;

        let (winners, prize_details) = self.check(&number, &data.days_info).await;

        tracing::debug!(number = %number, winning_days = winners.len(), prizes = prize_details.len(), "checked number");

        Ok(CheckResult::build(&number, &data, &winners, prize_details))
    }
}
