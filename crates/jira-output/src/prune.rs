//! Removing columns that carry no data, to shrink files before import.

use std::path::{Path, PathBuf};

use csv::ByteRecord;
use tracing::{info, warn};

use crate::error::Result;
use crate::naming::pruned_path;
use crate::records::{read_records, write_records};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PruneOutcome {
    /// Nothing was written; the input is usable as is.
    Unchanged(PathBuf),
    Written { path: PathBuf, removed: Vec<String> },
}

impl PruneOutcome {
    /// The file to use from now on.
    pub fn path(&self) -> &Path {
        match self {
            Self::Unchanged(path) | Self::Written { path, .. } => path,
        }
    }
}

/// Writes `<stem>_noEmptyColumns.csv` next to `path`, keeping only columns
/// that have a non-empty cell in at least one data row.
///
/// A file without data rows is left alone.
pub fn prune_empty_columns(path: &Path) -> Result<PruneOutcome> {
    let records = read_records(path)?;
    let Some((header, rows)) = records.split_first() else {
        warn!(path = %path.display(), "no records found, empty columns not removed");
        return Ok(PruneOutcome::Unchanged(path.to_path_buf()));
    };
    if rows.is_empty() {
        warn!(path = %path.display(), "no data rows, empty columns not removed");
        return Ok(PruneOutcome::Unchanged(path.to_path_buf()));
    }

    let has_data: Vec<bool> = (0..header.len())
        .map(|column| {
            rows.iter()
                .any(|row| row.get(column).is_some_and(|cell| !cell.is_empty()))
        })
        .collect();
    let removed: Vec<String> = header
        .iter()
        .zip(&has_data)
        .filter(|(_, keep)| !**keep)
        .map(|(name, _)| String::from_utf8_lossy(name).into_owned())
        .collect();

    let pruned: Vec<ByteRecord> = records
        .iter()
        .map(|record| {
            record
                .iter()
                .zip(&has_data)
                .filter(|(_, keep)| **keep)
                .map(|(cell, _)| cell)
                .collect()
        })
        .collect();

    let target = pruned_path(path);
    write_records(&target, &pruned)?;
    info!(
        source = %path.display(),
        output = %target.display(),
        removed = removed.len(),
        kept = has_data.iter().filter(|keep| **keep).count(),
        "removed empty columns"
    );
    Ok(PruneOutcome::Written {
        path: target,
        removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn header_only_file_is_unchanged() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("in.csv");
        fs::write(&input, "A,B\n").expect("write");
        let outcome = prune_empty_columns(&input).expect("prune");
        assert_eq!(outcome, PruneOutcome::Unchanged(input.clone()));
        assert!(!pruned_path(&input).exists());
    }

    #[test]
    fn latin1_cells_are_copied_byte_for_byte() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("in.csv");
        fs::write(&input, b"Summary,Sprint,Assignee\ncaf\xe9,,carol\n").expect("write");

        let outcome = prune_empty_columns(&input).expect("prune");
        let PruneOutcome::Written { path, removed } = outcome else {
            panic!("expected a pruned file");
        };
        assert_eq!(removed, vec!["Sprint"]);
        assert_eq!(
            fs::read(path).expect("read"),
            b"Summary,Assignee\ncaf\xe9,carol\n".to_vec()
        );
    }
}
