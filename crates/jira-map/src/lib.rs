#![deny(unsafe_code)]

//! Building, cleaning, and persisting source-to-target mapping tables.

pub mod clean;
pub mod error;
pub mod lookup;
pub mod names;
pub mod resolve;
pub mod store;

pub use clean::{clean_mapping, clean_resolutions};
pub use error::{MapError, Result};
pub use lookup::{UserDirectory, find_user};
pub use names::split_display_name;
pub use resolve::{UserResolver, resolve_issue_types};
pub use store::{MappingStore, read_mapping, write_mapping};
