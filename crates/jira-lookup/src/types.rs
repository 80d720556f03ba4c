//! Response payloads.

use std::collections::BTreeSet;

use serde::Deserialize;

use jira_model::DirectoryUser;

/// `serverInfo` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerInfo {
    pub base_url: String,
    pub version: String,
    pub server_title: String,
}

/// `user/search` response. Some server versions answer a search with a
/// single object instead of an array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserSearchResponse {
    Many(Vec<DirectoryUser>),
    One(DirectoryUser),
}

impl UserSearchResponse {
    pub fn into_users(self) -> Vec<DirectoryUser> {
        match self {
            Self::Many(users) => users,
            Self::One(user) => vec![user],
        }
    }
}

/// `issue/createmeta` response, reduced to the issue type names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateMeta {
    pub projects: Vec<ProjectMeta>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectMeta {
    pub key: String,
    pub issuetypes: Vec<IssueTypeMeta>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IssueTypeMeta {
    pub name: String,
}

impl CreateMeta {
    /// Issue type names across all returned projects.
    pub fn issue_type_names(&self) -> BTreeSet<String> {
        self.projects
            .iter()
            .flat_map(|project| &project.issuetypes)
            .map(|issue_type| issue_type.name.clone())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_search_accepts_array_or_object() {
        let many: UserSearchResponse = serde_json::from_str(
            r#"[{"name":"jdoe","displayName":"John Doe"},{"name":"asmith","displayName":"Anna Smith"}]"#,
        )
        .expect("array");
        assert_eq!(many.into_users().len(), 2);

        let one: UserSearchResponse =
            serde_json::from_str(r#"{"name":"jdoe","displayName":"John Doe","active":false}"#)
                .expect("object");
        let users = one.into_users();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "jdoe");
    }

    #[test]
    fn create_meta_collects_names() {
        let meta: CreateMeta = serde_json::from_str(
            r#"{
                "expand": "projects",
                "projects": [{
                    "key": "NEW",
                    "name": "New project",
                    "issuetypes": [
                        {"id": "1", "name": "Bug"},
                        {"id": "2", "name": "Story"},
                        {"id": "3", "name": "Bug"}
                    ]
                }]
            }"#,
        )
        .expect("createmeta");
        let names: Vec<_> = meta.issue_type_names().into_iter().collect();
        assert_eq!(names, vec!["Bug", "Story"]);
    }

    #[test]
    fn server_info_ignores_unknown_fields() {
        let info: ServerInfo = serde_json::from_str(
            r#"{"baseUrl":"https://t","version":"8.20.1","versionNumbers":[8,20,1],"serverTitle":"Old Tracker"}"#,
        )
        .expect("server info");
        assert_eq!(info.server_title, "Old Tracker");
        assert_eq!(info.version, "8.20.1");
    }
}
