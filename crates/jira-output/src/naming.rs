//! Output file names and directories.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{OutputError, Result};

const SPLIT_INFIX: &str = "_split_";
const PRUNED_SUFFIX: &str = "_noEmptyColumns.csv";

/// File name stem of `path`, or `"output"` when it has none.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "output".to_string())
}

/// `<stem>_split_<index>.csv`; `index` is 1-based.
pub fn split_file_name(stem: &str, index: usize) -> String {
    format!("{stem}{SPLIT_INFIX}{index}.csv")
}

/// Index `k` of a file named `<stem>_split_<k>.csv`.
pub fn split_index(file_name: &str, stem: &str) -> Option<usize> {
    file_name
        .strip_prefix(stem)?
        .strip_prefix(SPLIT_INFIX)?
        .strip_suffix(".csv")?
        .parse()
        .ok()
}

/// `<stem>_noEmptyColumns.csv` next to `path`.
pub fn pruned_path(path: &Path) -> PathBuf {
    path.with_file_name(format!("{}{PRUNED_SUFFIX}", file_stem(path)))
}

/// Ensure an output directory exists.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| OutputError::Write {
        path: dir.to_path_buf(),
        source,
    })
}

/// Ensure a parent directory exists for a file path.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(parent)?;
    }
    Ok(())
}
