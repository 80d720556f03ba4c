//! Source file discovery.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Lists all CSV files in a directory.
///
/// Returns files sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        // Check for .csv extension (case-insensitive)
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if is_csv {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Expands configured sources into the ordered list of CSV files to process.
///
/// Folders contribute their CSV files in filename order, files are kept as
/// given. Sources that cannot be read are logged and skipped.
pub fn resolve_sources(sources: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for source in sources {
        if source.is_dir() {
            match list_csv_files(source) {
                Ok(found) => {
                    debug!(folder = %source.display(), file_count = found.len(), "listed source folder");
                    files.extend(found);
                }
                Err(error) => warn!(%error, "skipping unreadable source folder"),
            }
        } else if source.is_file() {
            files.push(source.clone());
        } else {
            let error = IngestError::SourceNotFound {
                path: source.clone(),
            };
            warn!(%error, "skipping missing source");
        }
    }
    files
}
