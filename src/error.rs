//! Error taxonomy for the load → filter → aggregate pipeline.

use std::path::PathBuf;

/// Errors surfaced by the library.
///
/// Absence of an optional column is not an error; see
/// [`SchemaField::SchemaUnavailable`](crate::record::SchemaField).
#[derive(Debug, thiserror::Error)]
pub enum BikeshareError {
    #[error("trip data source `{}` not found", .path.display())]
    SourceNotFound { path: PathBuf },

    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("required column `{column}` missing from header")]
    MissingColumn { column: &'static str },

    #[error("cannot compute {stat}: filtered dataset is empty")]
    EmptyDataset { stat: &'static str },

    #[error("invalid {kind} selector `{value}`")]
    InvalidSelector { kind: &'static str, value: String },

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, BikeshareError>;
