use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::loader::LoadPolicy;

pub const DEFAULT_LOG_FILE: &str = "logs/bikeshare.log";
pub const DEFAULT_RAW_ROWS: usize = 5;

/// Runtime settings, read from the environment (and `.env` via `dotenvy`).
///
/// | Variable             | Default              |
/// |----------------------|----------------------|
/// | `BIKESHARE_DATA_DIR` | `.`                  |
/// | `BIKESHARE_STRICT`   | `false`              |
/// | `BIKESHARE_RAW_ROWS` | `5`                  |
/// | `LOG_FILE_PATH`      | `logs/bikeshare.log` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the per-city CSV files.
    pub data_dir: PathBuf,
    pub policy: LoadPolicy,
    /// Lines shown per page when paging through raw data.
    pub raw_rows: usize,
    pub log_file_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("."),
            policy: LoadPolicy::Skip,
            raw_rows: DEFAULT_RAW_ROWS,
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let data_dir = lookup("BIKESHARE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let strict = match lookup("BIKESHARE_STRICT") {
            Some(v) => parse_flag(&v)
                .with_context(|| format!("BIKESHARE_STRICT must be a boolean, got `{v}`"))?,
            None => false,
        };
        let policy = if strict { LoadPolicy::Strict } else { LoadPolicy::Skip };

        let raw_rows = match lookup("BIKESHARE_RAW_ROWS") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .with_context(|| format!("BIKESHARE_RAW_ROWS must be a positive integer, got `{v}`"))?,
            None => defaults.raw_rows,
        };

        let log_file_path = lookup("LOG_FILE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_file_path);

        Ok(Config {
            data_dir,
            policy,
            raw_rows,
            log_file_path,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
