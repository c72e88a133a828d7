//! Rendering of query reports.
//!
//! Supports a human-readable text layout, JSON serialization, and a debug
//! dump to the log.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::Result;
use tracing::debug;

use crate::record::SchemaField;
use crate::report::{Outcome, Report};
use crate::stats::{BirthYearStats, DurationStats, StationStats, TimeStats, UserStats};

const RULE: &str = "----------------------------------------";

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &Report) {
    debug!("{:#?}", report);
}

/// Serializes a report as pretty-printed JSON.
pub fn to_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Renders a report as plain text, one section per statistic.
pub fn render_text(report: &Report) -> String {
    TextReport(report).to_string()
}

struct TextReport<'a>(&'a Report);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(
            f,
            "Trips: {} (month: {}, day: {})",
            report.trips, report.month, report.day
        )?;
        writeln!(f, "{RULE}")?;

        section(f, "The Most Frequent Times of Travel", &report.time, write_time)?;
        section(f, "The Most Popular Stations and Trip", &report.stations, write_stations)?;
        section(f, "Trip Duration", &report.duration, write_duration)?;
        section(f, "User Stats", &report.users, write_users)
    }
}

fn section<T>(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    outcome: &Outcome<T>,
    body: fn(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    writeln!(f, "\n{title}\n")?;
    match outcome {
        Outcome::Computed { result } => body(f, result)?,
        Outcome::Failed { error } => writeln!(f, "Not available: {error}")?,
    }
    writeln!(f, "{RULE}")
}

fn write_time(f: &mut fmt::Formatter<'_>, stats: &TimeStats) -> fmt::Result {
    writeln!(f, "Most common month: {}", stats.most_common_month)?;
    writeln!(f, "Most common day: {}", stats.most_common_day)?;
    writeln!(f, "Most common hour: {}", stats.most_common_hour)
}

fn write_stations(f: &mut fmt::Formatter<'_>, stats: &StationStats) -> fmt::Result {
    writeln!(f, "Most common start station: {}", stats.most_common_start_station)?;
    writeln!(f, "Most common end station: {}", stats.most_common_end_station)?;
    writeln!(f, "Most common trip stations: {}", stats.most_common_trip)
}

fn write_duration(f: &mut fmt::Formatter<'_>, stats: &DurationStats) -> fmt::Result {
    writeln!(f, "Total travel time (Days, H:M:S): {}", stats.total)?;
    writeln!(f, "Average trip duration (H:M:S): {}", stats.mean)
}

fn write_counts(f: &mut fmt::Formatter<'_>, counts: &BTreeMap<String, u64>) -> fmt::Result {
    for (category, count) in counts {
        writeln!(f, "  {category}: {count}")?;
    }
    Ok(())
}

fn write_users(f: &mut fmt::Formatter<'_>, stats: &UserStats) -> fmt::Result {
    writeln!(f, "Types of user counts:")?;
    write_counts(f, &stats.user_types)?;

    match &stats.genders {
        SchemaField::SchemaUnavailable => writeln!(f, "\nData not available for Gender.")?,
        SchemaField::Available(counts) if counts.is_empty() => {
            writeln!(f, "\nNo gender values recorded.")?
        }
        SchemaField::Available(counts) => {
            writeln!(f, "\nGender counts:")?;
            write_counts(f, counts)?;
        }
    }

    match &stats.birth_years {
        SchemaField::SchemaUnavailable => writeln!(f, "\nData not available for Birth Year."),
        SchemaField::Available(None) => writeln!(f, "\nNo birth year values recorded."),
        SchemaField::Available(Some(BirthYearStats {
            earliest,
            most_recent,
            most_common,
        })) => {
            writeln!(f, "\nEarliest birth year: {earliest}")?;
            writeln!(f, "Latest birth year: {most_recent}")?;
            writeln!(f, "Most common birth year: {most_common}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{DaySelector, MonthSelector};
    use crate::record::Schema;
    use crate::stats::ElapsedTime;

    fn sample_report() -> Report {
        Report {
            month: MonthSelector::Month(6),
            day: DaySelector::All,
            trips: 2,
            schema: Schema::default(),
            time: Outcome::Computed {
                result: TimeStats {
                    most_common_month: "June",
                    most_common_day: "Friday",
                    most_common_hour: 17,
                },
            },
            stations: Outcome::Failed {
                error: "cannot compute station stats: filtered dataset is empty".to_string(),
            },
            duration: Outcome::Computed {
                result: DurationStats {
                    trips: 2,
                    sum_seconds: 90061.0,
                    total: ElapsedTime::from_secs(90061),
                    mean: ElapsedTime::from_secs(45030),
                },
            },
            users: Outcome::Computed {
                result: UserStats {
                    user_types: BTreeMap::from([("Subscriber".to_string(), 2)]),
                    genders: SchemaField::SchemaUnavailable,
                    birth_years: SchemaField::Available(None),
                },
            },
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample_report());
    }

    #[test]
    fn test_render_text_sections() {
        let text = render_text(&sample_report());

        assert!(text.starts_with("Trips: 2 (month: June, day: all)"));
        assert!(text.contains("Most common hour: 17"));
        assert!(text.contains("Not available: cannot compute station stats"));
        assert!(text.contains("Total travel time (Days, H:M:S): 1 day, 1:01:01"));
        assert!(text.contains("Average trip duration (H:M:S): 12:30:30"));
        assert!(text.contains("  Subscriber: 2"));
        assert!(text.contains("Data not available for Gender."));
        assert!(text.contains("No birth year values recorded."));
    }

    #[test]
    fn test_to_json_marks_unavailable_columns() {
        let json = to_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["users"]["result"]["genders"]["status"], "schema_unavailable");
        assert_eq!(value["users"]["result"]["birth_years"]["status"], "available");
        assert_eq!(value["duration"]["result"]["total"]["days"], 1);
    }
}
