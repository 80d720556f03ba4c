//! Reading exported tracker CSV files and discovering the identifiers they reference.

pub mod column_index;
pub mod csv_table;
pub mod discovery;
pub mod error;
pub mod extract;

pub use column_index::ColumnIndex;
pub use csv_table::{CsvTable, read_csv_table};
pub use discovery::{list_csv_files, resolve_sources};
pub use error::{IngestError, Result};
pub use extract::{
    ExtractorColumns, IdentifierExtractor, comment_identifiers, work_log_identifier,
};
