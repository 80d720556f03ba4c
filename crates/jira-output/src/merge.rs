//! Writing the substituted concatenation of all source files.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use jira_transform::Substituter;

use crate::error::{OutputError, Result};
use crate::naming::ensure_parent_dir;

/// Counts from a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub files: usize,
    pub lines: usize,
    /// Lines that were not valid UTF-8; they are copied with their original
    /// bytes and substituted like any other line.
    pub invalid_lines: usize,
    pub skipped: Vec<PathBuf>,
}

/// Applies `substituter` to every line of `sources`, in order, and writes the
/// result to `output`.
///
/// Sources are concatenated literally: the header line of each later source
/// is kept. An unreadable source is logged and skipped; a write failure
/// stops the merge and is returned.
pub fn merge_substituted(
    substituter: &Substituter,
    sources: &[PathBuf],
    output: &Path,
) -> Result<MergeSummary> {
    ensure_parent_dir(output)?;
    let write_error = |source| OutputError::Write {
        path: output.to_path_buf(),
        source,
    };
    let file = File::create(output).map_err(write_error)?;
    let mut writer = BufWriter::new(file);

    let mut summary = MergeSummary::default();
    for source in sources {
        let bytes = match read_source(source) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(error = %err, "skipping unreadable source");
                summary.skipped.push(source.clone());
                continue;
            }
        };
        let mut lines = 0usize;
        let mut invalid = Vec::new();
        for line in split_lines(&bytes) {
            lines += 1;
            if str::from_utf8(line).is_err() {
                invalid.push(lines);
            }
            writer
                .write_all(&substituter.replace_bytes(line))
                .map_err(write_error)?;
            writer.write_all(b"\n").map_err(write_error)?;
        }
        if !invalid.is_empty() {
            warn!(
                path = %source.display(),
                count = invalid.len(),
                lines = ?invalid,
                "lines are not valid UTF-8, copied unchanged apart from substitutions"
            );
        }
        info!(path = %source.display(), lines, "substituted source");
        summary.files += 1;
        summary.lines += lines;
        summary.invalid_lines += invalid.len();
    }
    writer.flush().map_err(write_error)?;

    info!(
        output = %output.display(),
        files = summary.files,
        lines = summary.lines,
        keys = substituter.len(),
        "wrote substituted output"
    );
    Ok(summary)
}

fn read_source(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| OutputError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Lines of `bytes` without their `\n` or `\r\n` terminator.
fn split_lines(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    bytes.split_inclusive(|&byte| byte == b'\n').map(|line| {
        let line = line.strip_suffix(b"\n").unwrap_or(line);
        line.strip_suffix(b"\r").unwrap_or(line)
    })
}
