//! Identifier extraction from exported tracker records.
//!
//! Identifiers appear in three shapes:
//! - user columns, where the cell is the identifier
//! - work-log columns, `<text>;<date>;<identifier>;<minutes>`
//! - comment columns, `<date>;<identifier>;<body>`, where the body may also
//!   tag other users as `[~identifier]`

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use jira_model::IdentifierSet;

use crate::column_index::ColumnIndex;
use crate::csv_table::{CsvTable, read_csv_table};
use crate::error::Result;

static USER_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[~([A-Za-z0-9_.@-]+?)\]").expect("user tag pattern is valid")
});

/// Names of the columns that carry identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorColumns {
    pub user_columns: Vec<String>,
    pub work_log_column: String,
    pub comment_column: String,
}

impl Default for ExtractorColumns {
    fn default() -> Self {
        Self {
            user_columns: ["Assignee", "Reporter", "Creator", "Watchers"]
                .into_iter()
                .map(String::from)
                .collect(),
            work_log_column: "Log Work".to_string(),
            comment_column: "Comment".to_string(),
        }
    }
}

/// Identifier in a work-log cell, if the cell has at least three fields.
///
/// Trailing empty fields are not counted, so `"a;b;"` has two fields.
pub fn work_log_identifier(cell: &str) -> Option<&str> {
    let mut fields: Vec<&str> = cell.split(';').collect();
    while fields.last().is_some_and(|field| field.is_empty()) {
        fields.pop();
    }
    if fields.len() >= 3 {
        Some(fields[2])
    } else {
        None
    }
}

/// Author and tagged identifiers in a comment cell.
///
/// The cell is split into at most three parts; anything else is not a
/// comment and yields nothing.
pub fn comment_identifiers(cell: &str) -> Vec<&str> {
    let parts: Vec<&str> = cell.splitn(3, ';').collect();
    let [_, author, body] = parts.as_slice() else {
        return Vec::new();
    };
    let mut identifiers = vec![*author];
    identifiers.extend(
        USER_TAG
            .captures_iter(*body)
            .filter_map(|captures| captures.get(1))
            .map(|tag| tag.as_str()),
    );
    identifiers
}

/// Walks tracker records and collects the identifiers they reference.
#[derive(Debug, Clone, Default)]
pub struct IdentifierExtractor {
    columns: ExtractorColumns,
}

impl IdentifierExtractor {
    pub fn new(columns: ExtractorColumns) -> Self {
        Self { columns }
    }

    /// Adds every identifier in `table` to `identifiers`.
    ///
    /// Columns missing from the header and rows too short to reach a column
    /// are skipped.
    pub fn extract_table(&self, table: &CsvTable, identifiers: &mut IdentifierSet) {
        let index = table.column_index();
        if index.is_empty() {
            return;
        }
        for row in &table.rows {
            for column in &self.columns.user_columns {
                for cell in cells(row, &index, column) {
                    add(identifiers, cell);
                }
            }
            for cell in cells(row, &index, &self.columns.work_log_column) {
                if let Some(identifier) = work_log_identifier(cell) {
                    add(identifiers, identifier);
                }
            }
            for cell in cells(row, &index, &self.columns.comment_column) {
                for identifier in comment_identifiers(cell) {
                    add(identifiers, identifier);
                }
            }
        }
    }

    pub fn extract_file(&self, path: &Path) -> Result<IdentifierSet> {
        let table = read_csv_table(path)?;
        let mut identifiers = IdentifierSet::new();
        self.extract_table(&table, &mut identifiers);
        debug!(
            path = %path.display(),
            rows = table.rows.len(),
            identifier_count = identifiers.len(),
            "extracted identifiers from file"
        );
        Ok(identifiers)
    }

    /// Union of the identifiers in every readable source.
    ///
    /// Unreadable sources are logged and contribute nothing.
    pub fn extract_sources(&self, sources: &[PathBuf]) -> IdentifierSet {
        let mut identifiers = IdentifierSet::new();
        for path in sources {
            match self.extract_file(path) {
                Ok(found) => identifiers.extend(found),
                Err(error) => warn!(%error, "skipping unreadable source"),
            }
        }
        info!(identifier_count = identifiers.len(), "found unique identifiers");
        identifiers
    }
}

fn cells<'a>(
    row: &'a [String],
    index: &'a ColumnIndex,
    column: &str,
) -> impl Iterator<Item = &'a str> {
    index
        .positions(column)
        .iter()
        .filter_map(|&position| row.get(position))
        .map(String::as_str)
}

fn add(identifiers: &mut IdentifierSet, identifier: &str) {
    if !identifier.is_empty() {
        identifiers.insert(identifier.to_string());
    }
}
