//! In-memory transformations of exported tracker records.
//!
//! - **substitute**: single-pass replacement of mapped identifiers and issue types
//! - **grouping**: stable grouping by category and priority ordering of the groups

pub mod error;
pub mod grouping;
pub mod substitute;

pub use error::{Result, TransformError};
pub use grouping::{RecordGroups, order_by_category};
pub use substitute::Substituter;
