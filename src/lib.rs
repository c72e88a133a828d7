//! Descriptive statistics over bike-share trip logs.
//!
//! The core is a load → filter → aggregate pipeline: [`loader`] parses a
//! city's CSV into [`record::TripRecord`]s, [`filter`] restricts them to a
//! month and/or weekday, and [`stats`] computes travel-time, station,
//! duration and rider summaries. [`report`] runs the four aggregators
//! concurrently; [`prompt`] and [`output`] are the interactive and rendering
//! front ends.

pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod prompt;
pub mod record;
pub mod report;
pub mod selection;
pub mod stats;

pub use error::BikeshareError;
pub use filter::{DaySelector, FilteredDataset, MonthSelector, filter, load_and_filter};
pub use loader::{Dataset, LoadPolicy, load};
pub use record::{Schema, SchemaField, TripRecord};
pub use report::{Outcome, Report, compute_report};
pub use stats::{compute_duration_stats, compute_station_stats, compute_time_stats, compute_user_stats};
