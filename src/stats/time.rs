use serde::Serialize;

use crate::error::{BikeshareError, Result};
use crate::filter::FilteredDataset;
use crate::record::{month_name, weekday_name};
use crate::stats::utility::mode;

/// The most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeStats {
    pub most_common_month: &'static str,
    pub most_common_day: &'static str,
    /// Hour of day, 0–23.
    pub most_common_hour: u32,
}

/// Most common month, weekday and start hour.
///
/// # Errors
///
/// Returns [`BikeshareError::EmptyDataset`] when there are no trips.
#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn compute_time_stats(dataset: &FilteredDataset) -> Result<TimeStats> {
    let empty = || BikeshareError::EmptyDataset { stat: "time stats" };
    let records = &dataset.records;

    let month = mode(records.iter().map(|r| r.month())).ok_or_else(empty)?;
    let day = mode(records.iter().map(|r| r.day_of_week())).ok_or_else(empty)?;
    let hour = mode(records.iter().map(|r| r.hour())).ok_or_else(empty)?;

    Ok(TimeStats {
        most_common_month: month_name(month).ok_or_else(empty)?,
        most_common_day: weekday_name(day),
        most_common_hour: hour,
    })
}
