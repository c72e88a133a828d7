//! CLI entry point for the bike-share statistics tool.
//!
//! Provides subcommands for a one-shot statistics query, paging through raw
//! trip data, and the interactive explore loop.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use bikeshare_stats::config::Config;
use bikeshare_stats::output::{print_pretty, render_text, to_json};
use bikeshare_stats::prompt::{display_raw_file, explore};
use bikeshare_stats::selection::resolve_source;
use bikeshare_stats::{DaySelector, LoadPolicy, MonthSelector, compute_report, load_and_filter};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare")]
#[command(about = "Descriptive statistics over US bike-share trip data", long_about = None)]
struct Cli {
    /// Directory holding the city CSV files (overrides BIKESHARE_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute travel-time, station, duration and user statistics
    Stats {
        /// City name (chicago, new york city, washington) or path to a CSV file
        #[arg(value_name = "CITY_OR_FILE")]
        source: String,

        /// Month to filter by: name, abbreviation, 1-12, or "all"
        #[arg(short, long, default_value = "all")]
        month: MonthSelector,

        /// Day of week to filter by: name, abbreviation, or "all"
        #[arg(short, long, default_value = "all")]
        day: DaySelector,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Fail on the first malformed row instead of skipping it
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Page through the raw lines of a trip data file
    Raw {
        /// City name or path to a CSV file
        #[arg(value_name = "CITY_OR_FILE")]
        source: String,

        /// Lines per page (overrides BIKESHARE_RAW_ROWS)
        #[arg(short, long)]
        rows: Option<usize>,
    },
    /// Interactively choose a city and filters, then view statistics
    Explore,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let mut config = Config::from_env()?;
    let _file_guard = init_logging(&config.log_file_path)?;

    let cli = Cli::parse();
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    match cli.command {
        Commands::Stats {
            source,
            month,
            day,
            json,
            strict,
        } => {
            if strict {
                config.policy = LoadPolicy::Strict;
            }
            let path = resolve_source(&source, &config.data_dir);
            let dataset = load_and_filter(&path, month, day, config.policy)
                .with_context(|| format!("failed to load trip data for `{source}`"))?;

            let report = compute_report(Arc::new(dataset)).await;
            print_pretty(&report);

            if json {
                println!("{}", to_json(&report)?);
            } else {
                println!("{}", render_text(&report));
            }
        }
        Commands::Raw { source, rows } => {
            let path = resolve_source(&source, &config.data_dir);
            let page_size = rows.unwrap_or(config.raw_rows).max(1);

            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            display_raw_file(&path, &mut stdin.lock(), &mut stdout.lock(), page_size)?;
        }
        Commands::Explore => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            explore(&mut stdin.lock(), &mut stdout.lock(), &config).await?;
            info!("Explore session finished");
        }
    }

    Ok(())
}

/// Colored stderr logging plus a JSON rolling log file.
///
/// The returned guard must be held for the life of the process so buffered
/// file output is flushed.
fn init_logging(log_file_path: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("bikeshare.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}
