//! Error types for mapping persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from reading or writing persisted mapping tables.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("mapping file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to write mapping file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to parse mapping file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, MapError>;
