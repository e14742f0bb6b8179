//! Domain model for drawn days, prizes and check results.
//!
//! `DaysInfo` keeps the page order of the calendar windows. It serializes as a
//! JSON object and deserializes back in document order, so a cache round-trip
//! never reshuffles the days.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Numbers drawn behind one calendar window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayInfo {
    pub numbers: Vec<String>,
    /// Window token (`window-<n>`) used for prize lookups.
    pub window_class: Option<String>,
}

/// Ordered mapping of day label to the numbers drawn that day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaysInfo {
    entries: Vec<(String, DayInfo)>,
}

impl DaysInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a day, keeping its first position if the label already exists.
    ///
    /// Days without numbers are dropped.
    pub fn insert(&mut self, day: impl Into<String>, info: DayInfo) {
        if info.numbers.is_empty() {
            return;
        }
        let day = day.into();
        match self.entries.iter_mut().find(|(label, _)| *label == day) {
            Some((_, existing)) => *existing = info,
            None => self.entries.push((day, info)),
        }
    }

    pub fn get(&self, day: &str) -> Option<&DayInfo> {
        self.entries.iter().find(|(label, _)| label == day).map(|(_, info)| info)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DayInfo)> {
        self.entries.iter().map(|(label, info)| (label.as_str(), info))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total count of drawn numbers across all days, duplicates included.
    pub fn total_numbers(&self) -> usize {
        self.entries.iter().map(|(_, info)| info.numbers.len()).sum()
    }
}

impl FromIterator<(String, DayInfo)> for DaysInfo {
    fn from_iter<I: IntoIterator<Item = (String, DayInfo)>>(iter: I) -> Self {
        let mut days = DaysInfo::new();
        for (day, info) in iter {
            days.insert(day, info);
        }
        days
    }
}

impl Serialize for DaysInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (day, info) in &self.entries {
            map.serialize_entry(day, info)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DaysInfo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DaysVisitor;

        impl<'de> Visitor<'de> for DaysVisitor {
            type Value = DaysInfo;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of day label to day info")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<DaysInfo, A::Error> {
                let mut days = DaysInfo::new();
                while let Some((day, info)) = access.next_entry::<String, DayInfo>()? {
                    days.insert(day, info);
                }
                Ok(days)
            }
        }

        deserializer.deserialize_map(DaysVisitor)
    }
}

/// One row of a day's prize table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeRecord {
    pub number: String,
    pub prize: String,
    pub value: String,
    pub sponsor: String,
}

/// Daily numbers as scraped from the landing page, plus when they were scraped.
///
/// This is the payload stored under the `advent_data` cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyData {
    pub winning_numbers: Vec<String>,
    pub days_info: DaysInfo,
    /// RFC 3339 timestamp of the origin fetch.
    pub cached_at: String,
}

/// A day on which the queried number was drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningDay {
    pub day: String,
    pub window_class: Option<String>,
}

/// A prize won by the queried number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeDetail {
    pub day: String,
    pub prize: String,
    pub value: String,
    pub sponsor: String,
}

/// Response body of a number check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub number: String,
    pub is_winner: bool,
    pub winning_days: Vec<String>,
    pub prize_details: Vec<PrizeDetail>,
    pub total_days_drawn: usize,
    pub total_winners: usize,
    pub all_results: DaysInfo,
    pub cached_at: Option<String>,
}

impl CheckResult {
    /// Assemble a check result from the daily data and what the checker found.
    ///
    /// Totals are derived from `days_info`, not from the flat number list, so
    /// `total_winners` always matches the sum of the per-day sequences.
    pub fn build(
        number: &str, data: &DailyData, winning_days: &[WinningDay], prize_details: Vec<PrizeDetail>,
    ) -> Self {
        Self {
            number: number.to_string(),
            is_winner: !winning_days.is_empty(),
            winning_days: winning_days.iter().map(|w| w.day.clone()).collect(),
            prize_details,
            total_days_drawn: data.days_info.len(),
            total_winners: data.days_info.total_numbers(),
            all_results: data.days_info.clone(),
            cached_at: Some(data.cached_at.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(numbers: &[&str], window: Option<&str>) -> DayInfo {
        DayInfo { numbers: numbers.iter().map(|n| n.to_string()).collect(), window_class: window.map(String::from) }
    }

    #[test]
    fn test_days_info_drops_empty_days() {
        let mut days = DaysInfo::new();
        days.insert("1", day(&["123"], Some("window-1")));
        days.insert("2", day(&[], Some("window-2")));
        assert_eq!(days.len(), 1);
        assert!(days.get("2").is_none());
    }

    #[test]
    fn test_days_info_preserves_order_through_json() {
        let days: DaysInfo = [
            ("10".to_string(), day(&["5"], Some("window-10"))),
            ("2".to_string(), day(&["6"], Some("window-2"))),
            ("1".to_string(), day(&["7", "8"], None)),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&days).unwrap();
        assert!(json.find("\"10\"").unwrap() < json.find("\"2\"").unwrap());

        let back: DaysInfo = serde_json::from_str(&json).unwrap();
        let labels: Vec<&str> = back.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["10", "2", "1"]);
        assert_eq!(back, days);
    }

    #[test]
    fn test_days_info_window_class_field_name() {
        let json = r#"{"1": {"numbers": ["123", "456"], "window_class": "window-1"}}"#;
        let days: DaysInfo = serde_json::from_str(json).unwrap();
        assert_eq!(days.get("1").unwrap().window_class.as_deref(), Some("window-1"));
    }

    #[test]
    fn test_total_numbers_counts_duplicates() {
        let days: DaysInfo =
            [("1".to_string(), day(&["1", "2"], None)), ("2".to_string(), day(&["2", "3", "4"], None))]
                .into_iter()
                .collect();
        assert_eq!(days.total_numbers(), 5);
    }

    #[test]
    fn test_check_result_build() {
        let days: DaysInfo = [("1".to_string(), day(&["123", "456"], Some("window-1")))].into_iter().collect();
        let data = DailyData {
            winning_numbers: vec!["123".into(), "456".into()],
            days_info: days,
            cached_at: "2025-12-01T10:00:00+00:00".into(),
        };
        let winning = vec![WinningDay { day: "1".into(), window_class: Some("window-1".into()) }];

        let result = CheckResult::build("123", &data, &winning, Vec::new());
        assert!(result.is_winner);
        assert_eq!(result.winning_days, vec!["1"]);
        assert_eq!(result.total_days_drawn, 1);
        assert_eq!(result.total_winners, 2);
        assert_eq!(result.cached_at.as_deref(), Some("2025-12-01T10:00:00+00:00"));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isWinner"], true);
        assert_eq!(json["totalWinners"], 2);
        assert_eq!(json["allResults"]["1"]["window_class"], "window-1");
    }
}
