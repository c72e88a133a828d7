//! Month and weekday predicates over loaded trips.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Serialize, Serializer};
use tracing::info;

use crate::error::{BikeshareError, Result};
use crate::loader::{self, Dataset, LoadPolicy};
use crate::record::{Schema, TripRecord, month_name, weekday_name};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Restricts trips to one calendar month of `start_time`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MonthSelector {
    #[default]
    All,
    Month(u32),
}

impl MonthSelector {
    pub fn month(month: u32) -> Result<Self> {
        if (1..=12).contains(&month) {
            Ok(MonthSelector::Month(month))
        } else {
            Err(BikeshareError::InvalidSelector {
                kind: "month",
                value: month.to_string(),
            })
        }
    }

    pub fn matches(&self, record: &TripRecord) -> bool {
        match self {
            MonthSelector::All => true,
            MonthSelector::Month(m) => record.month() == *m,
        }
    }
}

impl FromStr for MonthSelector {
    type Err = BikeshareError;

    /// Accepts `all`, a number 1–12, or an English month name or its
    /// three-letter abbreviation, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim().to_lowercase();
        if value == "all" {
            return Ok(MonthSelector::All);
        }
        if let Ok(n) = value.parse::<u32>() {
            return MonthSelector::month(n);
        }

        (1..=12)
            .find(|&m| {
                month_name(m).is_some_and(|name| {
                    let name = name.to_lowercase();
                    value == name || (value.len() == 3 && name.starts_with(&value))
                })
            })
            .map(MonthSelector::Month)
            .ok_or_else(|| BikeshareError::InvalidSelector {
                kind: "month",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for MonthSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthSelector::All => f.write_str("all"),
            MonthSelector::Month(m) => f.write_str(month_name(*m).unwrap_or("invalid")),
        }
    }
}

impl Serialize for MonthSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Restricts trips to one weekday of `start_time`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DaySelector {
    #[default]
    All,
    Day(Weekday),
}

impl DaySelector {
    pub fn matches(&self, record: &TripRecord) -> bool {
        match self {
            DaySelector::All => true,
            DaySelector::Day(d) => record.day_of_week() == *d,
        }
    }
}

impl FromStr for DaySelector {
    type Err = BikeshareError;

    /// Accepts `all` or an English weekday name or its three-letter
    /// abbreviation, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim().to_lowercase();
        if value == "all" {
            return Ok(DaySelector::All);
        }

        WEEKDAYS
            .iter()
            .copied()
            .find(|&d| {
                let name = weekday_name(d).to_lowercase();
                value == name || (value.len() == 3 && name.starts_with(&value))
            })
            .map(DaySelector::Day)
            .ok_or_else(|| BikeshareError::InvalidSelector {
                kind: "day",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for DaySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaySelector::All => f.write_str("all"),
            DaySelector::Day(d) => f.write_str(weekday_name(*d)),
        }
    }
}

impl Serialize for DaySelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Trips matching the active selectors, plus the schema of their table.
#[derive(Debug, Clone)]
pub struct FilteredDataset {
    pub records: Vec<TripRecord>,
    pub schema: Schema,
    pub month: MonthSelector,
    pub day: DaySelector,
}

impl FilteredDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Returns the subsequence of `records` matching both selectors, in order.
pub fn filter(records: &[TripRecord], month: MonthSelector, day: DaySelector) -> Vec<TripRecord> {
    records
        .iter()
        .filter(|r| month.matches(r) && day.matches(r))
        .cloned()
        .collect()
}

impl Dataset {
    /// Consumes the dataset, keeping only the trips matching both selectors.
    pub fn into_filtered(self, month: MonthSelector, day: DaySelector) -> FilteredDataset {
        let records: Vec<TripRecord> = self
            .records
            .into_iter()
            .filter(|r| month.matches(r) && day.matches(r))
            .collect();

        FilteredDataset {
            records,
            schema: self.schema,
            month,
            day,
        }
    }
}

/// Loads `source` and applies the month and day selectors.
#[tracing::instrument(skip_all, fields(source = %source.display(), month = %month, day = %day))]
pub fn load_and_filter(
    source: &Path,
    month: MonthSelector,
    day: DaySelector,
    policy: LoadPolicy,
) -> Result<FilteredDataset> {
    let dataset = loader::load(source, policy)?;
    let total = dataset.records.len();
    let filtered = dataset.into_filtered(month, day);

    info!(total, matched = filtered.len(), "Filters applied");
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trip(y: i32, m: u32, d: u32) -> TripRecord {
        let start = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        TripRecord::new(start, start, Some(60.0), "A", "B", "Subscriber")
    }

    fn sample() -> Vec<TripRecord> {
        vec![
            trip(2017, 1, 2),  // Monday
            trip(2017, 1, 3),  // Tuesday
            trip(2017, 2, 6),  // Monday
            trip(2017, 6, 30), // Friday
        ]
    }

    #[test]
    fn test_all_all_preserves_everything() {
        let records = sample();
        let out = filter(&records, MonthSelector::All, DaySelector::All);
        assert_eq!(out, records);
    }

    #[test]
    fn test_month_and_day_combined() {
        let records = sample();
        let out = filter(&records, MonthSelector::Month(1), DaySelector::Day(Weekday::Mon));
        assert_eq!(out, vec![records[0].clone()]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = sample();
        let once = filter(&records, MonthSelector::All, DaySelector::Day(Weekday::Mon));
        let twice = filter(&once, MonthSelector::All, DaySelector::Day(Weekday::Mon));
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let out = filter(&sample(), MonthSelector::Month(3), DaySelector::All);
        assert!(out.is_empty());
    }

    #[test]
    fn test_month_selector_parsing() {
        assert_eq!("all".parse::<MonthSelector>().unwrap(), MonthSelector::All);
        assert_eq!("ALL".parse::<MonthSelector>().unwrap(), MonthSelector::All);
        assert_eq!("3".parse::<MonthSelector>().unwrap(), MonthSelector::Month(3));
        assert_eq!("Mar".parse::<MonthSelector>().unwrap(), MonthSelector::Month(3));
        assert_eq!("june".parse::<MonthSelector>().unwrap(), MonthSelector::Month(6));
        assert!("13".parse::<MonthSelector>().is_err());
        assert!("ju".parse::<MonthSelector>().is_err());
    }

    #[test]
    fn test_day_selector_parsing() {
        assert_eq!("all".parse::<DaySelector>().unwrap(), DaySelector::All);
        assert_eq!("mon".parse::<DaySelector>().unwrap(), DaySelector::Day(Weekday::Mon));
        assert_eq!("SUNDAY".parse::<DaySelector>().unwrap(), DaySelector::Day(Weekday::Sun));
        assert!("funday".parse::<DaySelector>().is_err());
    }

    #[test]
    fn test_selector_display() {
        assert_eq!(MonthSelector::Month(3).to_string(), "March");
        assert_eq!(DaySelector::Day(Weekday::Thu).to_string(), "Thursday");
        assert_eq!(MonthSelector::All.to_string(), "all");
    }
}
