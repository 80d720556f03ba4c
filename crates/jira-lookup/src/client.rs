//! Blocking REST client for a tracker instance.
//!
//! Requests are sent one at a time. The client implements
//! [`UserDirectory`], so the resolvers in `jira-map` can use it directly.

use std::collections::BTreeSet;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use jira_map::UserDirectory;
use jira_model::DirectoryUser;

use crate::endpoint::Endpoint;
use crate::error::{LookupError, Result};
use crate::instance::{Credentials, InstanceConfig};
use crate::types::{CreateMeta, ServerInfo, UserSearchResponse};

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent string for API requests.
const USER_AGENT_VALUE: &str = concat!("jira-port/", env!("CARGO_PKG_VERSION"));

/// Client bound to one tracker instance.
#[derive(Debug, Clone)]
pub struct JiraClient {
    http: Client,
    instance: InstanceConfig,
}

impl JiraClient {
    /// Create a client without contacting the server.
    pub fn new(instance: InstanceConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(LookupError::Client)?;

        Ok(Self { http, instance })
    }

    /// Create a client and probe the server.
    ///
    /// A failed probe is logged; the client is still returned, so lookups
    /// degrade to "not found" instead of aborting the run.
    pub fn connect(instance: InstanceConfig) -> Result<Self> {
        let client = Self::new(instance)?;
        match client.server_info() {
            Ok(info) => info!(
                instance = %client.instance,
                title = %info.server_title,
                version = %info.version,
                "connected to tracker"
            ),
            Err(err) if err.is_unauthorized() => {
                warn!(instance = %client.instance, error = %err, "tracker rejected the credentials");
            }
            Err(err) => warn!(instance = %client.instance, error = %err, "tracker probe failed"),
        }
        Ok(client)
    }

    pub fn instance(&self) -> &InstanceConfig {
        &self.instance
    }

    pub fn server_info(&self) -> Result<ServerInfo> {
        self.get(&Endpoint::ServerInfo)
    }

    /// Raw user search; errors are returned to the caller.
    pub fn user_search(&self, query: &str) -> Result<Vec<DirectoryUser>> {
        let response: UserSearchResponse = self.get(&Endpoint::UserSearch {
            query: query.to_string(),
        })?;
        Ok(response.into_users())
    }

    pub fn create_meta(&self, project_key: &str) -> Result<CreateMeta> {
        self.get(&Endpoint::CreateMeta {
            project_key: project_key.to_string(),
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.instance.credentials {
            Credentials::Token(token) => request.bearer_auth(token),
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Credentials::Anonymous => request,
        }
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T> {
        let url = endpoint.url(&self.instance)?;
        debug!(endpoint = endpoint.path(), "GET");

        let network = |source| LookupError::Network {
            url: url.to_string(),
            source,
        };
        let response = self
            .authorize(self.http.get(url.clone()))
            .send()
            .map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .ok()
                .filter(|body| !body.trim().is_empty())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
            return Err(LookupError::Http {
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().map_err(network)?;
        serde_json::from_str(&body).map_err(|source| LookupError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl UserDirectory for JiraClient {
    type Error = LookupError;

    fn search_users(&self, query: &str) -> Result<Vec<DirectoryUser>> {
        self.user_search(query)
    }

    fn issue_type_names(&self, project_key: &str) -> Result<BTreeSet<String>> {
        let names = self.create_meta(project_key)?.issue_type_names();
        if names.is_empty() {
            warn!(instance = %self.instance, project_key, "no issue types returned for project");
        } else {
            debug!(instance = %self.instance, project_key, count = names.len(), "fetched issue types");
        }
        Ok(names)
    }

    fn describe(&self) -> String {
        self.instance.to_string()
    }
}

/// Issue type names of `project_key`, or an empty set when the call fails.
pub fn issue_types_or_empty<D: UserDirectory>(directory: &D, project_key: &str) -> BTreeSet<String> {
    directory
        .issue_type_names(project_key)
        .unwrap_or_else(|err| {
            warn!(
                instance = %directory.describe(),
                project_key,
                error = %err,
                "failed to fetch issue types"
            );
            BTreeSet::new()
        })
}
