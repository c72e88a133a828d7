//! Runs all four aggregators over one filtered dataset.
//!
//! Each aggregator runs as its own blocking task against a shared
//! `Arc<FilteredDataset>`. Outcomes are collected independently: a failing
//! aggregator is recorded as [`Outcome::Failed`] and never hides the others.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::error::Result;
use crate::filter::{DaySelector, FilteredDataset, MonthSelector};
use crate::record::Schema;
use crate::stats::{
    DurationStats, StationStats, TimeStats, UserStats, compute_duration_stats,
    compute_station_stats, compute_time_stats, compute_user_stats,
};

/// Result of a single aggregator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Computed { result: T },
    Failed { error: String },
}

impl<T> Outcome<T> {
    pub fn computed(&self) -> Option<&T> {
        match self {
            Outcome::Computed { result } => Some(result),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

/// Everything computed for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub month: MonthSelector,
    pub day: DaySelector,
    pub trips: usize,
    pub schema: Schema,
    pub time: Outcome<TimeStats>,
    pub stations: Outcome<StationStats>,
    pub duration: Outcome<DurationStats>,
    pub users: Outcome<UserStats>,
}

fn spawn_stat<T: Send + 'static>(
    dataset: &Arc<FilteredDataset>,
    compute: fn(&FilteredDataset) -> Result<T>,
) -> JoinHandle<Result<T>> {
    let dataset = Arc::clone(dataset);
    tokio::task::spawn_blocking(move || compute(&dataset))
}

async fn settle<T>(stat: &'static str, handle: JoinHandle<Result<T>>) -> Outcome<T> {
    match handle.await {
        Ok(Ok(result)) => Outcome::Computed { result },
        Ok(Err(e)) => {
            warn!(stat, error = %e, "Statistic unavailable");
            Outcome::Failed {
                error: e.to_string(),
            }
        }
        Err(e) => {
            error!(stat, error = %e, "Statistic task failed");
            Outcome::Failed {
                error: format!("{stat} task failed: {e}"),
            }
        }
    }
}

/// Computes time, station, duration and user statistics concurrently.
#[tracing::instrument(skip_all, fields(trips = dataset.len(), month = %dataset.month, day = %dataset.day))]
pub async fn compute_report(dataset: Arc<FilteredDataset>) -> Report {
    let time = spawn_stat(&dataset, compute_time_stats);
    let stations = spawn_stat(&dataset, compute_station_stats);
    let duration = spawn_stat(&dataset, compute_duration_stats);
    let users = spawn_stat(&dataset, compute_user_stats);

    Report {
        month: dataset.month,
        day: dataset.day,
        trips: dataset.len(),
        schema: dataset.schema,
        time: settle("time", time).await,
        stations: settle("stations", stations).await,
        duration: settle("duration", duration).await,
        users: settle("users", users).await,
    }
}
