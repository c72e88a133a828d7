use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;
use crate::filter::FilteredDataset;
use crate::record::SchemaField;
use crate::stats::utility::{min_max, mode};

/// Earliest, most recent and most common birth year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
}

/// Rider demographics.
///
/// `genders` and `birth_years` are [`SchemaField::SchemaUnavailable`] when
/// the source table has no such column. A present column whose cells are all
/// empty yields an empty map and `Available(None)` respectively.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub user_types: BTreeMap<String, u64>,
    pub genders: SchemaField<BTreeMap<String, u64>>,
    pub birth_years: SchemaField<Option<BirthYearStats>>,
}

fn count_by<'a>(values: impl Iterator<Item = &'a str>) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Counts user types and genders and summarizes birth years.
///
/// Never fails: an empty dataset produces empty counts.
#[tracing::instrument(skip_all, fields(trips = dataset.len()))]
pub fn compute_user_stats(dataset: &FilteredDataset) -> Result<UserStats> {
    let records = &dataset.records;
    let schema = dataset.schema;

    let user_types = count_by(records.iter().map(|r| r.user_type()));

    let genders = SchemaField::when(schema.has_gender, || {
        count_by(records.iter().filter_map(|r| r.gender()))
    });

    let birth_years = SchemaField::when(schema.has_birth_year, || -> Option<BirthYearStats> {
        let years = || records.iter().filter_map(|r| r.birth_year());
        let (earliest, most_recent) = min_max(years())?;
        let most_common = mode(years())?;
        Some(BirthYearStats {
            earliest,
            most_recent,
            most_common,
        })
    });

    Ok(UserStats {
        user_types,
        genders,
        birth_years,
    })
}
