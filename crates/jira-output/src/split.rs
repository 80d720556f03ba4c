//! Splitting an output file into category-ordered files of bounded size.
//!
//! The splitter moves through
//! `ComputingGroups -> OrderingCategories -> Flattening -> Writing(k) -> Done`,
//! entering `Failed(k)` when split file `k` cannot be written. Every split file
//! is complete and closed before the next one is started, so files written
//! before a failure stay valid.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use csv::ByteRecord;
use tracing::{debug, error, info, warn};

use jira_model::Mapping;
use jira_transform::RecordGroups;

use crate::error::{OutputError, Result};
use crate::naming::{ensure_dir, file_stem, split_file_name, split_index};
use crate::records::{read_records, write_records};

/// Default number of data rows per split file.
pub const DEFAULT_MAX_ROWS: NonZeroUsize = NonZeroUsize::new(1000).unwrap();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOptions {
    /// Header name of the category column.
    pub category_column: String,
    /// Maximum number of data rows per file.
    pub max_rows: NonZeroUsize,
    /// Directory receiving the split files.
    pub folder: PathBuf,
}

impl SplitOptions {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            category_column: "Issue Type".to_string(),
            max_rows: DEFAULT_MAX_ROWS,
            folder: folder.into(),
        }
    }

    #[must_use]
    pub fn with_category_column(mut self, column: impl Into<String>) -> Self {
        self.category_column = column.into();
        self
    }

    #[must_use]
    pub fn with_max_rows(mut self, max_rows: NonZeroUsize) -> Self {
        self.max_rows = max_rows;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitState {
    Idle,
    ComputingGroups,
    OrderingCategories,
    Flattening,
    /// Writing the 1-based split file `k`.
    Writing(usize),
    Done,
    /// Split file `k` could not be written.
    Failed(usize),
}

/// Result of a successful split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutcome {
    pub files: Vec<PathBuf>,
    pub rows: usize,
    /// Category order used for the output.
    pub categories: Vec<String>,
}

/// Splits a CSV file by category.
#[derive(Debug)]
pub struct Splitter<'a> {
    options: &'a SplitOptions,
    issue_types: &'a Mapping,
    state: SplitState,
}

impl<'a> Splitter<'a> {
    /// `issue_types` supplies the category priority: its distinct targets in
    /// insertion order.
    pub fn new(options: &'a SplitOptions, issue_types: &'a Mapping) -> Self {
        Self {
            options,
            issue_types,
            state: SplitState::Idle,
        }
    }

    pub fn state(&self) -> SplitState {
        self.state
    }

    fn enter(&mut self, state: SplitState) {
        debug!(from = ?self.state, to = ?state, "splitter state");
        self.state = state;
    }

    /// Splits `input` into `<stem>_split_<k>.csv` files in the configured folder.
    ///
    /// The first record is the header and is repeated in every split file;
    /// later records identical to it are dropped. Fails without writing
    /// anything when the category column is missing or there are no data rows.
    pub fn split_file(&mut self, input: &Path) -> Result<SplitOutcome> {
        self.state = SplitState::Idle;
        let mut records = read_records(input)?.into_iter();
        let Some(header) = records.next() else {
            return Err(OutputError::NoRows {
                path: input.to_path_buf(),
            });
        };
        let Some(column) = header
            .iter()
            .position(|name| header_matches(name, &self.options.category_column))
        else {
            return Err(OutputError::MissingColumn {
                path: input.to_path_buf(),
                column: self.options.category_column.clone(),
            });
        };

        let mut repeated_headers = 0usize;
        let rows: Vec<ByteRecord> = records
            .filter(|record| {
                let repeated = *record == header;
                repeated_headers += usize::from(repeated);
                !repeated
            })
            .collect();
        if repeated_headers > 0 {
            warn!(
                path = %input.display(),
                count = repeated_headers,
                "dropped repeated header rows"
            );
        }
        if rows.is_empty() {
            return Err(OutputError::NoRows {
                path: input.to_path_buf(),
            });
        }
        let total = rows.len();

        self.enter(SplitState::ComputingGroups);
        // A category that is not valid UTF-8 falls into the blank category.
        let groups = RecordGroups::build(rows, |record| {
            record
                .get(column)
                .and_then(|cell| str::from_utf8(cell).ok())
                .unwrap_or_default()
        });

        self.enter(SplitState::OrderingCategories);
        let categories = groups.priority_order(&self.issue_types.distinct_targets());

        self.enter(SplitState::Flattening);
        let ordered = groups.flatten(&categories);

        ensure_dir(&self.options.folder)?;
        let stem = file_stem(input);
        let mut files = Vec::new();
        for (offset, chunk) in ordered.chunks(self.options.max_rows.get()).enumerate() {
            let index = offset + 1;
            self.enter(SplitState::Writing(index));
            let path = self.options.folder.join(split_file_name(&stem, index));
            if let Err(err) = write_records(&path, std::iter::once(&header).chain(chunk)) {
                self.enter(SplitState::Failed(index));
                error!(path = %path.display(), error = %err, written = files.len(), "split failed");
                return Err(OutputError::Split {
                    path,
                    written: files,
                    source: Box::new(err),
                });
            }
            debug!(path = %path.display(), rows = chunk.len(), "wrote split file");
            files.push(path);
        }
        self.enter(SplitState::Done);
        let stale = remove_stale_splits(&self.options.folder, &stem, files.len());

        info!(
            input = %input.display(),
            rows = total,
            files = files.len(),
            stale_removed = stale.len(),
            max_rows = self.options.max_rows.get(),
            "split output by issue type"
        );
        Ok(SplitOutcome {
            files,
            rows: total,
            categories,
        })
    }
}

fn header_matches(name: &[u8], wanted: &str) -> bool {
    String::from_utf8_lossy(name)
        .trim_start_matches('\u{feff}')
        .trim()
        == wanted.trim()
}

/// Deletes `<stem>_split_<k>.csv` files left by an earlier run with `k`
/// above `keep`. Failures are logged and do not fail the split.
fn remove_stale_splits(folder: &Path, stem: &str, keep: usize) -> Vec<PathBuf> {
    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(folder = %folder.display(), error = %err, "cannot list split folder");
            return Vec::new();
        }
    };
    let mut removed = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let stale = entry
            .file_name()
            .to_str()
            .and_then(|name| split_index(name, stem))
            .is_some_and(|index| index > keep);
        if !stale || !path.is_file() {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(path = %path.display(), "removed split file from an earlier run");
                removed.push(path);
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot remove stale split file");
            }
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(value: usize) -> NonZeroUsize {
        NonZeroUsize::new(value).expect("non-zero")
    }

    #[test]
    fn missing_category_column_writes_nothing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("in.csv");
        fs::write(&input, "Summary,Type\nA,Bug\n").expect("write");

        let options = SplitOptions::new(dir.path().join("split"));
        let mapping = Mapping::new();
        let mut splitter = Splitter::new(&options, &mapping);
        let err = splitter.split_file(&input).unwrap_err();
        assert!(matches!(err, OutputError::MissingColumn { .. }));
        assert_eq!(splitter.state(), SplitState::Idle);
        assert!(!dir.path().join("split").exists());
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("in.csv");
        fs::write(&input, "Summary,Issue Type\nSummary,Issue Type\n").expect("write");

        let options = SplitOptions::new(dir.path());
        let mapping = Mapping::new();
        let err = Splitter::new(&options, &mapping).split_file(&input).unwrap_err();
        assert!(matches!(err, OutputError::NoRows { .. }));
    }

    #[test]
    fn bom_prefixed_header_is_found() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("in.csv");
        fs::write(&input, "\u{feff}Issue Type,Summary\nBug,a\n").expect("write");

        let options = SplitOptions::new(dir.path().join("out")).with_max_rows(nz(5));
        let mapping = Mapping::new();
        let mut splitter = Splitter::new(&options, &mapping);
        let outcome = splitter.split_file(&input).expect("split");
        assert_eq!(outcome.files.len(), 1);
        assert_eq!(splitter.state(), SplitState::Done);
    }

    #[test]
    fn failed_write_keeps_finished_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("in.csv");
        fs::write(&input, "Issue Type\nBug\nBug\nBug\n").expect("write");
        let folder = dir.path().join("split");
        fs::create_dir_all(folder.join("in_split_2.csv")).expect("block second file");

        let options = SplitOptions::new(&folder).with_max_rows(nz(2));
        let mapping = Mapping::new();
        let mut splitter = Splitter::new(&options, &mapping);
        let err = splitter.split_file(&input).unwrap_err();

        assert_eq!(splitter.state(), SplitState::Failed(2));
        assert!(err.is_write_failure());
        let OutputError::Split { written, .. } = err else {
            panic!("expected split failure");
        };
        assert_eq!(written, vec![folder.join("in_split_1.csv")]);
        assert_eq!(
            fs::read_to_string(folder.join("in_split_1.csv")).expect("read"),
            "Issue Type\nBug\nBug\n"
        );
    }

    #[test]
    fn rerun_with_fewer_rows_removes_old_split_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("in.csv");
        let folder = dir.path().join("split");
        fs::create_dir_all(&folder).expect("folder");
        for name in ["in_split_2.csv", "in_split_7.csv", "in_split_x.csv", "other_split_3.csv"] {
            fs::write(folder.join(name), "old").expect("old file");
        }
        fs::write(&input, "Issue Type\nBug\n").expect("write");

        let options = SplitOptions::new(&folder).with_max_rows(nz(5));
        let mapping = Mapping::new();
        let outcome = Splitter::new(&options, &mapping)
            .split_file(&input)
            .expect("split");

        assert_eq!(outcome.files, vec![folder.join("in_split_1.csv")]);
        assert!(!folder.join("in_split_2.csv").exists());
        assert!(!folder.join("in_split_7.csv").exists());
        assert!(folder.join("in_split_x.csv").exists());
        assert!(folder.join("other_split_3.csv").exists());
    }

    #[test]
    fn latin1_rows_are_split_unchanged() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("in.csv");
        fs::write(&input, b"Summary,Issue Type\ncaf\xe9,Bug\nplain,Story\n").expect("write");

        let options = SplitOptions::new(dir.path().join("split"));
        let mapping: Mapping = [("Story", "Story"), ("Bug", "Bug")].into_iter().collect();
        let outcome = Splitter::new(&options, &mapping)
            .split_file(&input)
            .expect("split");

        assert_eq!(
            fs::read(&outcome.files[0]).expect("read"),
            b"Summary,Issue Type\nplain,Story\ncaf\xe9,Bug\n".to_vec()
        );
    }
}
