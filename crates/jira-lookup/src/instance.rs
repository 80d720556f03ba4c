//! Connection settings for one tracker instance.

use std::fmt;

/// How requests authenticate against the instance.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// `Authorization: Bearer <token>`.
    Token(String),
    /// HTTP basic authentication.
    Basic { username: String, password: String },
    Anonymous,
}

impl Credentials {
    /// Chooses the auth scheme from the configured values: a non-empty token
    /// wins over a username and password.
    pub fn from_parts(username: Option<&str>, password: Option<&str>, token: Option<&str>) -> Self {
        match (token, username) {
            (Some(token), _) if !token.is_empty() => Self::Token(token.to_string()),
            (_, Some(username)) if !username.is_empty() => Self::Basic {
                username: username.to_string(),
                password: password.unwrap_or_default().to_string(),
            },
            _ => Self::Anonymous,
        }
    }
}

// Secrets never reach log output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Token([REDACTED])"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::Anonymous => f.write_str("Anonymous"),
        }
    }
}

/// Location and credentials of a tracker instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceConfig {
    pub scheme: String,
    pub host: String,
    pub credentials: Credentials,
}

impl InstanceConfig {
    pub fn new(host: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            scheme: "https".to_string(),
            host: host.into(),
            credentials,
        }
    }

    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// `scheme://host` without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.host.trim_end_matches('/'))
    }
}

impl fmt::Display for InstanceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_wins_over_basic() {
        let creds = Credentials::from_parts(Some("admin"), Some("secret"), Some("tok"));
        assert_eq!(creds, Credentials::Token("tok".to_string()));
    }

    #[test]
    fn empty_token_falls_back_to_basic() {
        let creds = Credentials::from_parts(Some("admin"), Some("secret"), Some(""));
        assert!(matches!(creds, Credentials::Basic { ref username, .. } if username == "admin"));
        assert_eq!(Credentials::from_parts(None, None, None), Credentials::Anonymous);
    }

    #[test]
    fn debug_hides_secrets() {
        let creds = Credentials::from_parts(Some("admin"), Some("hunter2"), None);
        let text = format!("{creds:?}");
        assert!(text.contains("admin"));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn base_url_trims_trailing_slash() {
        let instance =
            InstanceConfig::new("tracker.example.com/", Credentials::Anonymous).with_scheme("http");
        assert_eq!(instance.base_url(), "http://tracker.example.com");
    }
}
