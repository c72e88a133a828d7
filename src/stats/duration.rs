use std::fmt;

use serde::Serialize;

use crate::error::{BikeshareError, Result};
use crate::filter::FilteredDataset;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// A whole number of seconds split into days, hours, minutes and seconds.
///
/// Displays like `2 days, 3:04:05`, or `3:04:05` under a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ElapsedTime {
    pub total_seconds: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl ElapsedTime {
    pub fn from_secs(total_seconds: u64) -> Self {
        ElapsedTime {
            total_seconds,
            days: total_seconds / SECS_PER_DAY,
            hours: total_seconds % SECS_PER_DAY / SECS_PER_HOUR,
            minutes: total_seconds % SECS_PER_HOUR / SECS_PER_MINUTE,
            seconds: total_seconds % SECS_PER_MINUTE,
        }
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.days {
            0 => {}
            1 => write!(f, "1 day, ")?,
            n => write!(f, "{n} days, ")?,
        }
        write!(f, "{}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Whole seconds of a non-negative duration, truncated toward zero.
fn whole_seconds(secs: f64) -> u64 {
    debug_assert!(secs >= 0.0, "trip durations are non-negative, got {secs}");
    secs.trunc() as u64
}

/// Total and average trip duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub trips: u64,
    /// Untruncated sum of every trip duration, in seconds.
    pub sum_seconds: f64,
    pub total: ElapsedTime,
    pub mean: ElapsedTime,
}

/// Sums trip durations and takes their mean, both truncated to whole
/// seconds (never rounded).
///
/// # Errors
///
/// Returns [`BikeshareError::EmptyDataset`] when there are no trips.
#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn compute_duration_stats(dataset: &FilteredDataset) -> Result<DurationStats> {
    if dataset.is_empty() {
        return Err(BikeshareError::EmptyDataset {
            stat: "trip duration stats",
        });
    }

    let trips = dataset.len() as u64;
    let sum_seconds: f64 = dataset.records.iter().map(|r| r.trip_duration()).sum();
    let mean_seconds = sum_seconds / trips as f64;

    Ok(DurationStats {
        trips,
        sum_seconds,
        total: ElapsedTime::from_secs(whole_seconds(sum_seconds)),
        mean: ElapsedTime::from_secs(whole_seconds(mean_seconds)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{DaySelector, MonthSelector};
    use crate::record::{Schema, TripRecord};
    use chrono::NaiveDate;

    fn trip(secs: f64) -> TripRecord {
        let start = NaiveDate::from_ymd_opt(2017, 2, 14)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap();
        TripRecord::new(start, start, Some(secs), "A", "B", "Subscriber")
    }

    fn dataset(records: Vec<TripRecord>) -> FilteredDataset {
        FilteredDataset {
            records,
            schema: Schema::default(),
            month: MonthSelector::All,
            day: DaySelector::All,
        }
    }

    #[test]
    fn test_mean_is_truncated_not_rounded() {
        let stats = compute_duration_stats(&dataset(vec![trip(100.0), trip(101.0)])).unwrap();
        assert_eq!(stats.mean.total_seconds, 100);
        assert_eq!(stats.total.total_seconds, 201);
    }

    #[test]
    fn test_sum_matches_arithmetic_sum() {
        let durations = [489.066, 402.549, 1610.0, 321.0];
        let records = durations.iter().copied().map(trip).collect();
        let stats = compute_duration_stats(&dataset(records)).unwrap();

        let expected: f64 = durations.iter().sum();
        assert_eq!(stats.sum_seconds, expected);
        assert_eq!(stats.total.total_seconds, 2822);
        assert_eq!(stats.trips, 4);
    }

    #[test]
    fn test_reversed_trip_without_duration_counts_as_zero() {
        let at = |h: u32| {
            NaiveDate::from_ymd_opt(2017, 2, 14)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap()
        };
        let ten_minutes = TripRecord::new(at(10), at(10) + chrono::Duration::minutes(10), None, "A", "B", "Subscriber");
        let reversed = TripRecord::new(at(11), at(10), None, "A", "B", "Subscriber");

        let stats = compute_duration_stats(&dataset(vec![ten_minutes, reversed])).unwrap();
        assert_eq!(stats.sum_seconds, 600.0);
        assert_eq!(stats.total.to_string(), "0:10:00");
        assert_eq!(stats.mean.total_seconds, 300);
    }

    #[test]
    fn test_empty_dataset() {
        let err = compute_duration_stats(&dataset(vec![])).unwrap_err();
        assert!(matches!(err, BikeshareError::EmptyDataset { .. }));
    }

    #[test]
    fn test_elapsed_time_breakdown() {
        let t = ElapsedTime::from_secs(2 * SECS_PER_DAY + 3 * SECS_PER_HOUR + 4 * 60 + 5);
        assert_eq!((t.days, t.hours, t.minutes, t.seconds), (2, 3, 4, 5));
        assert_eq!(t.to_string(), "2 days, 3:04:05");
    }

    #[test]
    fn test_elapsed_time_display() {
        assert_eq!(ElapsedTime::from_secs(0).to_string(), "0:00:00");
        assert_eq!(ElapsedTime::from_secs(754).to_string(), "0:12:34");
        assert_eq!(ElapsedTime::from_secs(SECS_PER_DAY + 61).to_string(), "1 day, 0:01:01");
    }
}
