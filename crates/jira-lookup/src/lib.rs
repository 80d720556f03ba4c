//! Tracker REST lookups: user search and issue type metadata.

pub mod client;
pub mod endpoint;
pub mod error;
pub mod instance;
pub mod types;

pub use client::{JiraClient, issue_types_or_empty};
pub use endpoint::Endpoint;
pub use error::{LookupError, Result};
pub use instance::{Credentials, InstanceConfig};
pub use types::{CreateMeta, ServerInfo, UserSearchResponse};
