//! Trip records and the table-level schema descriptor.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English name of a month number (1–12).
pub fn month_name(month: u32) -> Option<&'static str> {
    let idx = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(idx).copied()
}

/// English name of a weekday, e.g. `Monday`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// One trip observation.
///
/// `month` and `day_of_week` are derived from `start_time` on construction
/// and cannot drift from it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    trip_duration: f64,
    start_station: String,
    end_station: String,
    user_type: String,
    gender: Option<String>,
    birth_year: Option<i32>,
    month: u32,
    day_of_week: Weekday,
}

impl TripRecord {
    /// Builds a record; a missing `trip_duration` is derived from the timestamps.
    ///
    /// Durations are never negative: a trip that ends before it starts gets a
    /// derived duration of zero.
    pub fn new(
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        trip_duration: Option<f64>,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
        user_type: impl Into<String>,
    ) -> Self {
        let trip_duration = trip_duration.unwrap_or_else(|| {
            let elapsed = end_time - start_time;
            elapsed.num_milliseconds() as f64 / 1000.0
        });
        let trip_duration = trip_duration.max(0.0);

        TripRecord {
            start_time,
            end_time,
            trip_duration,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type: user_type.into(),
            gender: None,
            birth_year: None,
            month: start_time.month(),
            day_of_week: start_time.weekday(),
        }
    }

    pub fn with_gender(mut self, gender: Option<String>) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_birth_year(mut self, birth_year: Option<i32>) -> Self {
        self.birth_year = birth_year;
        self
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveDateTime {
        self.end_time
    }

    /// Trip length in seconds.
    pub fn trip_duration(&self) -> f64 {
        self.trip_duration
    }

    pub fn start_station(&self) -> &str {
        &self.start_station
    }

    pub fn end_station(&self) -> &str {
        &self.end_station
    }

    pub fn user_type(&self) -> &str {
        &self.user_type
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birth_year
    }

    /// Month of `start_time`, 1–12.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day_of_week(&self) -> Weekday {
        self.day_of_week
    }

    pub fn hour(&self) -> u32 {
        self.start_time.hour()
    }

    /// `true` when the trip ends before it starts.
    pub fn is_out_of_order(&self) -> bool {
        self.end_time < self.start_time
    }
}

/// Which optional columns a source table carries.
///
/// Detected once from the header row; applies to every record of the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub has_trip_duration: bool,
    pub has_gender: bool,
    pub has_birth_year: bool,
}

/// Result for a statistic that depends on an optional column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum SchemaField<T> {
    Available(T),
    /// The table has no such column. Expected, not an error.
    SchemaUnavailable,
}

impl<T> SchemaField<T> {
    /// Runs `compute` only when the column is present.
    pub fn when(present: bool, compute: impl FnOnce() -> T) -> Self {
        if present {
            SchemaField::Available(compute())
        } else {
            SchemaField::SchemaUnavailable
        }
    }

    pub fn available(&self) -> Option<&T> {
        match self {
            SchemaField::Available(value) => Some(value),
            SchemaField::SchemaUnavailable => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, SchemaField::SchemaUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_derives_month_and_weekday() {
        // 2017-03-15 was a Wednesday
        let rec = TripRecord::new(at(2017, 3, 15, 8), at(2017, 3, 15, 9), Some(3600.0), "A", "B", "Subscriber");
        assert_eq!(rec.month(), 3);
        assert_eq!(rec.day_of_week(), Weekday::Wed);
        assert_eq!(rec.hour(), 8);
    }

    #[test]
    fn test_duration_derived_when_absent() {
        let rec = TripRecord::new(at(2017, 1, 1, 10), at(2017, 1, 1, 11), None, "A", "B", "Customer");
        assert_eq!(rec.trip_duration(), 3600.0);
    }

    #[test]
    fn test_out_of_order_detection() {
        let rec = TripRecord::new(at(2017, 1, 1, 11), at(2017, 1, 1, 10), Some(0.0), "A", "B", "Customer");
        assert!(rec.is_out_of_order());
    }

    #[test]
    fn test_derived_duration_never_negative() {
        let rec = TripRecord::new(at(2017, 1, 1, 11), at(2017, 1, 1, 10), None, "A", "B", "Customer");
        assert!(rec.is_out_of_order());
        assert_eq!(rec.trip_duration(), 0.0);
    }

    #[test]
    fn test_month_name_bounds() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn test_schema_field_when() {
        assert_eq!(SchemaField::when(true, || 3), SchemaField::Available(3));
        assert!(SchemaField::<u8>::when(false, || unreachable!()).is_unavailable());
    }
}
