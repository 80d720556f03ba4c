//! Error types for output generation.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    /// Failed to read an input file.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse an input CSV file.
    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Failed to create a directory or write an output file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("column '{column}' not found in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("no data rows in {path}")]
    NoRows { path: PathBuf },

    /// A split file could not be written. Files listed in `written` were
    /// completed before the failure and remain valid.
    #[error("failed to write split file {path}: {source}")]
    Split {
        path: PathBuf,
        written: Vec<PathBuf>,
        #[source]
        source: Box<OutputError>,
    },
}

impl OutputError {
    /// Whether this is a write failure (as opposed to unusable input).
    pub fn is_write_failure(&self) -> bool {
        matches!(self, Self::Write { .. } | Self::Split { .. })
    }
}

pub type Result<T> = std::result::Result<T, OutputError>;
