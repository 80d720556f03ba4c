//! Run settings, read from a TOML file.
//!
//! Lookup order: the `--config` path, `jira-port.toml` in the working
//! directory, then `jira-port.toml` in the platform config directory:
//! - macOS: ~/Library/Application Support/com.jira-port.jira-port/
//! - Windows: %APPDATA%/jira-port/jira-port/config/
//! - Linux: ~/.config/jira-port/

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use jira_ingest::ExtractorColumns;
use jira_lookup::{Credentials, InstanceConfig};

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "jira-port";
const APP_NAME: &str = "jira-port";
pub const CONFIG_FILENAME: &str = "jira-port.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub source: SourceSettings,
    pub target: TargetSettings,
    pub files: FileSettings,
    pub split: SplitSettings,
    pub columns: ColumnSettings,
}

/// Connection details shared by both instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceSettings {
    pub host: String,
    pub scheme: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Personal access token; used instead of username and password when set.
    pub token: Option<String>,
    pub project_key: String,
}

impl Default for InstanceSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            scheme: "https".to_string(),
            username: None,
            password: None,
            token: None,
            project_key: String::new(),
        }
    }
}

impl InstanceSettings {
    pub fn instance_config(&self) -> InstanceConfig {
        let credentials = Credentials::from_parts(
            self.username.as_deref(),
            self.password.as_deref(),
            self.token.as_deref(),
        );
        InstanceConfig::new(self.host.clone(), credentials).with_scheme(self.scheme.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    #[serde(flatten)]
    pub instance: InstanceSettings,
    /// Display names read `Last, First`.
    pub last_name_displayed_first: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSettings {
    #[serde(flatten)]
    pub instance: InstanceSettings,
    /// Identifier assigned when a user cannot be matched.
    pub default_username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    /// CSV files or folders of CSV files.
    pub sources: Vec<PathBuf>,
    pub output_csv: PathBuf,
    pub user_map: PathBuf,
    pub issue_type_map: PathBuf,
    pub split_folder: PathBuf,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            output_csv: PathBuf::from("jira_updated.csv"),
            user_map: PathBuf::from("user_mapping.csv"),
            issue_type_map: PathBuf::from("issue_type_mapping.csv"),
            split_folder: PathBuf::from("split"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitSettings {
    pub max_issue_count: usize,
    pub category_column: String,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            max_issue_count: 1000,
            category_column: "Issue Type".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSettings {
    pub user_columns: Vec<String>,
    pub work_log_column: String,
    pub comment_column: String,
}

impl Default for ColumnSettings {
    fn default() -> Self {
        let columns = ExtractorColumns::default();
        Self {
            user_columns: columns.user_columns,
            work_log_column: columns.work_log_column,
            comment_column: columns.comment_column,
        }
    }
}

impl From<&ColumnSettings> for ExtractorColumns {
    fn from(settings: &ColumnSettings) -> Self {
        Self {
            user_columns: settings.user_columns.clone(),
            work_log_column: settings.work_log_column.clone(),
            comment_column: settings.comment_column.clone(),
        }
    }
}

impl Settings {
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text).context("parse settings")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects settings no run can use.
    pub fn validate(&self) -> Result<()> {
        if self.split.max_issue_count == 0 {
            bail!("split.max_issue_count must be at least 1");
        }
        if self.files.sources.is_empty() {
            bail!("files.sources must name at least one CSV file or folder");
        }
        Ok(())
    }

    pub fn max_rows(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.split.max_issue_count).unwrap_or(jira_output::DEFAULT_MAX_ROWS)
    }

    /// Resolves relative file paths against `base`, normally the settings
    /// file's directory.
    #[must_use]
    pub fn relative_to(mut self, base: &Path) -> Self {
        let join = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        self.files.sources.iter_mut().for_each(join);
        join(&mut self.files.output_csv);
        join(&mut self.files.user_map);
        join(&mut self.files.issue_type_map);
        join(&mut self.files.split_folder);
        self
    }
}

/// Platform config file location, if the platform has one.
pub fn platform_settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Finds the settings file to use.
pub fn locate_settings(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.is_file() {
        return Some(local);
    }
    platform_settings_path().filter(|path| path.is_file())
}

/// Loads and validates settings. Relative paths in the file are taken
/// relative to the file's directory.
pub fn load_settings(explicit: Option<&Path>) -> Result<(Settings, PathBuf)> {
    let Some(path) = locate_settings(explicit) else {
        bail!("no settings file found; pass --config or create {CONFIG_FILENAME}");
    };
    let text = fs::read_to_string(&path)
        .with_context(|| format!("read settings {}", path.display()))?;
    let settings = Settings::from_toml(&text)
        .with_context(|| format!("load settings {}", path.display()))?;
    let base = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    tracing::info!(path = %path.display(), "loaded settings");
    Ok((settings.relative_to(&base), path))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[source]
host = "old.tracker.example.com"
username = "admin"
password = "secret"
project_key = "OLD"
last_name_displayed_first = true

[target]
host = "new.tracker.example.com"
scheme = "http"
token = "abc123"
project_key = "NEW"
default_username = "migration"

[files]
sources = ["exports"]

[split]
max_issue_count = 250
"#;

    #[test]
    fn sample_parses_with_defaults() {
        let settings = Settings::from_toml(SAMPLE).expect("parse");
        assert!(settings.source.last_name_displayed_first);
        assert_eq!(settings.source.instance.scheme, "https");
        assert_eq!(settings.target.default_username, "migration");
        assert_eq!(settings.split.max_issue_count, 250);
        assert_eq!(settings.split.category_column, "Issue Type");
        assert_eq!(settings.columns.comment_column, "Comment");
        assert_eq!(settings.files.user_map, PathBuf::from("user_mapping.csv"));
    }

    #[test]
    fn token_selects_bearer_auth() {
        let settings = Settings::from_toml(SAMPLE).expect("parse");
        let target = settings.target.instance.instance_config();
        assert_eq!(target.credentials, Credentials::Token("abc123".to_string()));
        assert_eq!(target.base_url(), "http://new.tracker.example.com");
        let source = settings.source.instance.instance_config();
        assert!(matches!(source.credentials, Credentials::Basic { .. }));
    }

    #[test]
    fn zero_split_size_is_rejected() {
        let text = SAMPLE.replace("max_issue_count = 250", "max_issue_count = 0");
        let err = Settings::from_toml(&text).unwrap_err();
        assert!(err.to_string().contains("max_issue_count"));
    }

    #[test]
    fn missing_sources_are_rejected() {
        let err = Settings::from_toml("[split]\nmax_issue_count = 10\n").unwrap_err();
        assert!(err.to_string().contains("files.sources"));
    }

    #[test]
    fn relative_paths_follow_settings_file() {
        let settings = Settings::from_toml(SAMPLE)
            .expect("parse")
            .relative_to(Path::new("/work"));
        assert_eq!(settings.files.sources, vec![PathBuf::from("/work/exports")]);
        assert_eq!(settings.files.split_folder, PathBuf::from("/work/split"));
    }
}
