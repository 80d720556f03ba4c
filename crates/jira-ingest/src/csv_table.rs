use std::path::Path;

use csv::{ByteRecord, ErrorKind, ReaderBuilder};
use tracing::warn;

use crate::column_index::ColumnIndex;
use crate::error::{IngestError, Result};

/// A fully-read CSV file: the first record is the header, the rest are data rows.
///
/// Duplicate header names are kept as-is; use [`ColumnIndex`] to address
/// every occurrence of a name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn column_index(&self) -> ColumnIndex {
        ColumnIndex::from_headers(&self.headers)
    }

    /// Cell at `column` in data row `row`; short rows yield `None`.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

/// Reads a CSV file with its first record as the header.
///
/// Data cells are returned verbatim; identifiers are matched exactly, so no
/// trimming is applied to them. Rows may be shorter or longer than the header.
/// A cell that is not valid UTF-8 is logged and read as blank; the rest of
/// its row is kept. Only I/O errors fail the read.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let csv_error = |source| IngestError::CsvParse {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let mut records = reader.byte_records();
    let Some(header) = records.next() else {
        return Ok(CsvTable::default());
    };
    let headers = header
        .map_err(csv_error)?
        .iter()
        .map(|name| normalize_header(&String::from_utf8_lossy(name)))
        .collect();

    let mut rows = Vec::new();
    for (offset, record) in records.enumerate() {
        let line = offset + 2;
        match record {
            Ok(record) => rows.push(decode_row(path, line, &record)),
            Err(err) if matches!(err.kind(), ErrorKind::Io(_)) => return Err(csv_error(err)),
            Err(err) => {
                warn!(path = %path.display(), line, error = %err, "skipping malformed row");
            }
        }
    }
    Ok(CsvTable { headers, rows })
}

fn decode_row(path: &Path, line: usize, record: &ByteRecord) -> Vec<String> {
    record
        .iter()
        .enumerate()
        .map(|(column, cell)| match str::from_utf8(cell) {
            Ok(text) => text.to_string(),
            Err(_) => {
                warn!(
                    path = %path.display(),
                    line,
                    column = column + 1,
                    "cell is not valid UTF-8, reading it as blank"
                );
                String::new()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_normalized_but_cells_are_verbatim() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("export.csv");
        std::fs::write(&path, "\u{feff}Issue  Type,Assignee\nBug, jdoe \n").expect("write");

        let table = read_csv_table(&path).expect("read csv");
        assert_eq!(table.headers, vec!["Issue Type", "Assignee"]);
        assert_eq!(table.cell(0, 1), Some(" jdoe "));
        assert_eq!(table.cell(0, 5), None);
    }

    #[test]
    fn empty_file_yields_empty_table() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "").expect("write");

        let table = read_csv_table(&path).expect("read csv");
        assert!(table.is_empty());
        assert!(table.column_index().is_empty());
    }

    #[test]
    fn undecodable_cell_is_blank_and_row_is_kept() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("export.csv");
        std::fs::write(&path, b"Summary,Assignee\ncaf\xe9,carol\n").expect("write");

        let table = read_csv_table(&path).expect("read csv");
        assert_eq!(table.rows, vec![vec![String::new(), "carol".to_string()]]);
    }
}
