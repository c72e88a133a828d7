//! Descriptive statistics over a filtered trip dataset.
//!
//! Four independent aggregators share the read-only [`FilteredDataset`]:
//! travel times, station popularity, trip duration and rider demographics.
//! None mutates its input, so they can run in any order or concurrently
//! (see [`crate::report`]).
//!
//! [`FilteredDataset`]: crate::filter::FilteredDataset

pub mod duration;
pub mod station;
pub mod time;
pub mod user;
pub mod utility;

pub use duration::{DurationStats, ElapsedTime, compute_duration_stats};
pub use station::{StationStats, TRIP_SEPARATOR, compute_station_stats};
pub use time::{TimeStats, compute_time_stats};
pub use user::{BirthYearStats, UserStats, compute_user_stats};
