use serde::Serialize;

use crate::error::{BikeshareError, Result};
use crate::filter::FilteredDataset;
use crate::stats::utility::mode;

/// Joins start and end station into a single trip key.
pub const TRIP_SEPARATOR: &str = " and ";

/// The most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub most_common_start_station: String,
    pub most_common_end_station: String,
    /// `"<start> and <end>"`
    pub most_common_trip: String,
}

/// Most common start station, end station and start/end pair.
///
/// # Errors
///
/// Returns [`BikeshareError::EmptyDataset`] when there are no trips.
#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn compute_station_stats(dataset: &FilteredDataset) -> Result<StationStats> {
    let empty = || BikeshareError::EmptyDataset {
        stat: "station stats",
    };
    let records = &dataset.records;

    let start = mode(records.iter().map(|r| r.start_station())).ok_or_else(empty)?;
    let end = mode(records.iter().map(|r| r.end_station())).ok_or_else(empty)?;
    let trip = mode(
        records
            .iter()
            .map(|r| format!("{}{TRIP_SEPARATOR}{}", r.start_station(), r.end_station())),
    )
    .ok_or_else(empty)?;

    Ok(StationStats {
        most_common_start_station: start.to_string(),
        most_common_end_station: end.to_string(),
        most_common_trip: trip,
    })
}
