//! Typed REST endpoints used by the client.

use reqwest::Url;

use crate::error::{LookupError, Result};
use crate::instance::InstanceConfig;

/// One REST call, with its path and query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Instance title and version.
    ServerInfo,
    /// Substring search over login, display name and email, inactive users included.
    UserSearch { query: String },
    /// Issue types available when creating issues in a project.
    CreateMeta { project_key: String },
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::ServerInfo => "/rest/api/2/serverInfo",
            Self::UserSearch { .. } => "/rest/api/2/user/search",
            Self::CreateMeta { .. } => "/rest/api/2/issue/createmeta",
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::ServerInfo => Vec::new(),
            Self::UserSearch { query } => vec![("username", query.as_str()), ("includeInactive", "true")],
            Self::CreateMeta { project_key } => {
                vec![("projectKeys", project_key.as_str()), ("expand", "issuetypeNames")]
            }
        }
    }

    /// Full URL of this endpoint on `instance`, with query values encoded.
    pub fn url(&self, instance: &InstanceConfig) -> Result<Url> {
        let raw = format!("{}{}", instance.base_url(), self.path());
        let invalid = |message: String| LookupError::InvalidUrl {
            url: raw.clone(),
            message,
        };
        let pairs = self.query_pairs();
        let url = if pairs.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, &pairs)
        };
        let url = url.map_err(|err| invalid(err.to_string()))?;
        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }
        Ok(url)
    }
}
