use serde::{Deserialize, Serialize};

/// A user account as reported by a tracker instance's directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
    /// Login handle; this is the identifier embedded in exported records.
    pub name: String,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub display_name: String,
}

/// Search criteria for locating a user, applied in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub identifier: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserQuery {
    pub fn by_identifier(identifier: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.identifier.is_none()
            && self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
    }
}
