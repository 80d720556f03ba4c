//! Raw CSV records for re-parsing and rewriting output files.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::{ByteRecord, ReaderBuilder, WriterBuilder};

use crate::error::{OutputError, Result};
use crate::naming::ensure_parent_dir;

/// Reads every record of a CSV file, header included, without altering cells.
/// Cells are kept as bytes, so text that is not valid UTF-8 survives a rewrite.
pub fn read_records(path: &Path) -> Result<Vec<ByteRecord>> {
    let csv_error = |source| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;
    reader
        .byte_records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(csv_error)
}

/// Writes `records` to `path` through a temporary sibling file that is
/// renamed into place once everything is flushed. A failed write leaves no
/// file at `path`.
pub fn write_records<'a, I>(path: &Path, records: I) -> Result<()>
where
    I: IntoIterator<Item = &'a ByteRecord>,
{
    ensure_parent_dir(path)?;
    let partial = partial_path(path);
    let write_error = |source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };

    let result = (|| -> std::io::Result<()> {
        let file = File::create(&partial)?;
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .from_writer(BufWriter::new(file));
        for record in records {
            writer.write_record(record)?;
        }
        let mut inner = writer
            .into_inner()
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        inner.flush()?;
        inner.get_ref().sync_all()?;
        Ok(())
    })();

    match result.and_then(|()| fs::rename(&partial, path)) {
        Ok(()) => Ok(()),
        Err(source) => {
            let _ = fs::remove_file(&partial);
            Err(write_error(source))
        }
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}
