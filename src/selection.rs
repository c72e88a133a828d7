//! Resolution of user-supplied city names into trip data sources.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::BikeshareError;
use crate::filter::{DaySelector, MonthSelector};

/// Cities with a bundled trip log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    pub fn name(&self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

impl FromStr for City {
    type Err = BikeshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chicago" => Ok(City::Chicago),
            "new york city" | "new york" | "nyc" => Ok(City::NewYorkCity),
            "washington" | "dc" => Ok(City::Washington),
            _ => Err(BikeshareError::InvalidSelector {
                kind: "city",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps a city name to its file under `data_dir`; anything else is taken
/// as a path as-is.
pub fn resolve_source(identifier: &str, data_dir: &Path) -> PathBuf {
    match identifier.parse::<City>() {
        Ok(city) => data_dir.join(city.file_name()),
        Err(_) => PathBuf::from(identifier),
    }
}

/// A validated query: which table to read and how to filter it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub source: PathBuf,
    pub month: MonthSelector,
    pub day: DaySelector,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_parsing() {
        assert_eq!("Chicago".parse::<City>().unwrap(), City::Chicago);
        assert_eq!("  NEW YORK CITY ".parse::<City>().unwrap(), City::NewYorkCity);
        assert_eq!("nyc".parse::<City>().unwrap(), City::NewYorkCity);
        assert_eq!("washington".parse::<City>().unwrap(), City::Washington);
        assert!("boston".parse::<City>().is_err());
    }

    #[test]
    fn test_resolve_known_city() {
        let path = resolve_source("chicago", Path::new("/data"));
        assert_eq!(path, PathBuf::from("/data/chicago.csv"));
    }

    #[test]
    fn test_resolve_falls_back_to_path() {
        let path = resolve_source("trips/boston.csv", Path::new("/data"));
        assert_eq!(path, PathBuf::from("trips/boston.csv"));
    }
}
