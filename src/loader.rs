//! CSV loader for trip logs.
//!
//! Reads a header-first, comma-separated table into [`TripRecord`]s.
//! Optional columns (`Trip Duration`, `Gender`, `Birth Year`) are detected
//! once from the header and recorded on the [`Schema`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord};
use flate2::read::GzDecoder;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{BikeshareError, Result};
use crate::record::{Schema, TripRecord};

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

/// Skipped rows kept with their reason; later ones are only counted.
pub const MAX_SKIPPED_DETAILS: usize = 100;

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// What to do with a row that cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Skip the row, log it, and keep loading.
    #[default]
    Skip,
    /// Fail the whole load on the first bad row.
    Strict,
}

/// A row dropped under [`LoadPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

/// Bookkeeping for a single load.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadSummary {
    pub rows_read: u64,
    pub rows_loaded: u64,
    /// Every row dropped under [`LoadPolicy::Skip`].
    pub skipped_rows: u64,
    /// The first [`MAX_SKIPPED_DETAILS`] dropped rows.
    pub skipped: Vec<SkippedRow>,
    /// Rows kept even though `End Time` precedes `Start Time`.
    pub out_of_order: u64,
}

/// Every record of one source table, in file order.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<TripRecord>,
    pub schema: Schema,
    pub summary: LoadSummary,
}

struct Columns {
    start_time: usize,
    end_time: usize,
    start_station: usize,
    end_station: usize,
    user_type: usize,
    trip_duration: Option<usize>,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |column: &'static str| find(column).ok_or(BikeshareError::MissingColumn { column });

        Ok(Columns {
            start_time: require(START_TIME)?,
            end_time: require(END_TIME)?,
            start_station: require(START_STATION)?,
            end_station: require(END_STATION)?,
            user_type: require(USER_TYPE)?,
            trip_duration: find(TRIP_DURATION),
            gender: find(GENDER),
            birth_year: find(BIRTH_YEAR),
        })
    }

    fn schema(&self) -> Schema {
        Schema {
            has_trip_duration: self.trip_duration.is_some(),
            has_gender: self.gender.is_some(),
            has_birth_year: self.birth_year.is_some(),
        }
    }
}

/// Opens a trip data source for reading. Files ending in `.gz` are
/// decompressed on the fly.
///
/// # Errors
///
/// Returns [`BikeshareError::SourceNotFound`] if `path` does not exist.
pub fn open_source(path: &Path) -> Result<Box<dyn Read + Send>> {
    if !path.exists() {
        return Err(BikeshareError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|source| BikeshareError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_gzip = path.extension().and_then(|e| e.to_str()) == Some("gz");
    debug!(path = %path.display(), is_gzip, "Opened trip data source");

    if is_gzip {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Loads a trip table from `path`.
///
/// # Errors
///
/// Returns [`BikeshareError::SourceNotFound`] if `path` does not exist,
/// [`BikeshareError::MissingColumn`] if a required header is absent, and
/// [`BikeshareError::MalformedRow`] for a bad row under [`LoadPolicy::Strict`].
#[tracing::instrument(skip(policy), fields(path = %path.display()))]
pub fn load(path: &Path, policy: LoadPolicy) -> Result<Dataset> {
    load_from_reader(open_source(path)?, policy)
}

/// Loads a trip table from any reader producing CSV text.
pub fn load_from_reader<R: Read>(reader: R, policy: LoadPolicy) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let schema = columns.schema();
    debug!(?schema, "Detected table schema");

    let mut records = Vec::new();
    let mut summary = LoadSummary::default();

    for result in rdr.records() {
        summary.rows_read += 1;

        let parsed = match result {
            Ok(row) => {
                let line = row.position().map_or(summary.rows_read + 1, |p| p.line());
                parse_row(&row, &columns).map_err(|reason| (line, reason))
            }
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                let line = e.position().map_or(summary.rows_read + 1, |p| p.line());
                Err((line, e.to_string()))
            }
        };

        match parsed {
            Ok(record) => {
                if record.is_out_of_order() {
                    summary.out_of_order += 1;
                    warn!(start = %record.start_time(), end = %record.end_time(), "Trip ends before it starts");
                }
                records.push(record);
            }
            Err((line, reason)) => match policy {
                LoadPolicy::Strict => return Err(BikeshareError::MalformedRow { line, reason }),
                LoadPolicy::Skip => {
                    warn!(line, %reason, "Skipping malformed row");
                    summary.skipped_rows += 1;
                    if summary.skipped.len() < MAX_SKIPPED_DETAILS {
                        summary.skipped.push(SkippedRow { line, reason });
                    }
                }
            },
        }
    }

    summary.rows_loaded = records.len() as u64;

    if summary.skipped_rows > 0 {
        warn!(skipped = summary.skipped_rows, "Malformed rows were skipped");
    }
    info!(
        rows_read = summary.rows_read,
        rows_loaded = summary.rows_loaded,
        out_of_order = summary.out_of_order,
        "Trip data loaded"
    );

    Ok(Dataset {
        records,
        schema,
        summary,
    })
}

fn parse_row(row: &StringRecord, columns: &Columns) -> std::result::Result<TripRecord, String> {
    let cell = |idx: usize| row.get(idx).map(str::trim).filter(|v| !v.is_empty());
    let optional = |idx: Option<usize>| idx.and_then(cell);
    let required = |idx: usize, name: &str| cell(idx).ok_or_else(|| format!("missing `{name}`"));

    let start_time = parse_timestamp(required(columns.start_time, START_TIME)?, START_TIME)?;
    let end_time = parse_timestamp(required(columns.end_time, END_TIME)?, END_TIME)?;
    let start_station = required(columns.start_station, START_STATION)?;
    let end_station = required(columns.end_station, END_STATION)?;
    let user_type = required(columns.user_type, USER_TYPE)?;

    let trip_duration = optional(columns.trip_duration)
        .map(|raw| match raw.parse::<f64>() {
            Ok(secs) if secs.is_finite() && secs >= 0.0 => Ok(secs),
            _ => Err(format!("invalid `{TRIP_DURATION}` value `{raw}`")),
        })
        .transpose()?;

    let birth_year = optional(columns.birth_year)
        .map(|raw| parse_year(raw).ok_or_else(|| format!("invalid `{BIRTH_YEAR}` value `{raw}`")))
        .transpose()?;

    let gender = optional(columns.gender).map(str::to_string);

    if trip_duration.is_none() && end_time < start_time {
        warn!(start = %start_time, end = %end_time, "Derived trip duration is negative, clamping to zero");
    }

    Ok(
        TripRecord::new(start_time, end_time, trip_duration, start_station, end_station, user_type)
            .with_gender(gender)
            .with_birth_year(birth_year),
    )
}

fn parse_timestamp(raw: &str, name: &str) -> std::result::Result<NaiveDateTime, String> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| format!("unparsable `{name}` value `{raw}`"))
}

/// Accepts `1985` as well as the float form `1985.0` some exports use.
fn parse_year(raw: &str) -> Option<i32> {
    if let Ok(year) = raw.parse::<i32>() {
        return Some(year);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= f64::from(i32::MAX) {
        Some(value as i32)
    } else {
        None
    }
}
