//! Persisted mapping tables.
//!
//! A mapping file is a headerless two-column CSV, one `source,target` record
//! per entry, in mapping order. Standard CSV quoting covers values that
//! contain commas or quotes.

use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use tracing::{debug, error, info, warn};

use jira_model::Mapping;

use crate::error::{MapError, Result};

/// Writes `mapping` to `path`, replacing any existing file.
pub fn write_mapping(mapping: &Mapping, path: &Path) -> Result<()> {
    let write_error = |source| MapError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(write_error)?;
    for (source, target) in mapping.iter() {
        writer.write_record([source, target]).map_err(write_error)?;
    }
    writer
        .flush()
        .map_err(|source| write_error(csv::Error::from(source)))?;
    Ok(())
}

/// Reads a mapping file.
///
/// When a key repeats, the first occurrence wins and later ones are logged
/// and discarded. Records with fewer than two fields are skipped.
pub fn read_mapping(path: &Path) -> Result<Mapping> {
    if !path.is_file() {
        return Err(MapError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let csv_error = |source| MapError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let mut mapping = Mapping::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        let (Some(source), Some(target)) = (record.get(0), record.get(1)) else {
            warn!(path = %path.display(), line = line + 1, "skipping mapping record without a target");
            continue;
        };
        if !mapping.insert_first(source, target) {
            warn!(
                path = %path.display(),
                line = line + 1,
                source,
                kept = mapping.get(source).unwrap_or_default(),
                discarded = target,
                "duplicate mapping entry, keeping the first one"
            );
        }
    }
    Ok(mapping)
}

/// A mapping table persisted at a fixed location.
///
/// `save` and `load` are the phase-boundary operations: they log failures
/// and never abort the run.
#[derive(Debug, Clone)]
pub struct MappingStore {
    path: PathBuf,
    label: String,
}

impl MappingStore {
    /// Create a store for the file at `path`; `label` names the mapping in logs.
    pub fn new(path: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `mapping`. On failure the error is logged and returned so the
    /// caller can report it; any previous file content is not restored.
    pub fn save(&self, mapping: &Mapping) -> Result<()> {
        match write_mapping(mapping, &self.path) {
            Ok(()) => {
                info!(
                    mapping = %self.label,
                    path = %self.path.display(),
                    entries = mapping.len(),
                    "saved mapping"
                );
                Ok(())
            }
            Err(err) => {
                error!(mapping = %self.label, error = %err, "failed to save mapping");
                Err(err)
            }
        }
    }

    /// Load the persisted mapping; a missing, empty, or unreadable file
    /// yields an empty mapping.
    pub fn load(&self) -> Mapping {
        match read_mapping(&self.path) {
            Ok(mapping) if mapping.is_empty() => {
                warn!(mapping = %self.label, path = %self.path.display(), "mapping file is empty");
                mapping
            }
            Ok(mapping) => {
                debug!(
                    mapping = %self.label,
                    path = %self.path.display(),
                    entries = mapping.len(),
                    "loaded mapping"
                );
                mapping
            }
            Err(err @ MapError::NotFound { .. }) => {
                warn!(mapping = %self.label, error = %err, "no persisted mapping, using an empty one");
                Mapping::new()
            }
            Err(err) => {
                error!(mapping = %self.label, error = %err, "failed to load mapping, using an empty one");
                Mapping::new()
            }
        }
    }
}
