//! Output generation for migrated tracker exports.
//!
//! - **merge**: substituted concatenation of all source files
//! - **split**: category-ordered split files of bounded size
//! - **prune**: copies without empty columns

pub mod error;
pub mod merge;
pub mod naming;
pub mod prune;
pub mod records;
pub mod split;

pub use error::{OutputError, Result};
pub use merge::{MergeSummary, merge_substituted};
pub use naming::{pruned_path, split_file_name};
pub use prune::{PruneOutcome, prune_empty_columns};
pub use split::{DEFAULT_MAX_ROWS, SplitOptions, SplitOutcome, SplitState, Splitter};
