//! Resolving source values against a target instance.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use jira_model::{DirectoryUser, IdentifierSet, Resolution, ResolutionTable, UserQuery};

use crate::lookup::{UserDirectory, find_user};
use crate::names::split_display_name;

/// Maps each source category to the first target category that contains it.
///
/// Targets are tried in sorted order. Matching is plain substring
/// containment (`target.contains(source)`); sources without a match are
/// left unresolved.
pub fn resolve_issue_types(
    source_names: &BTreeSet<String>,
    target_names: &BTreeSet<String>,
) -> ResolutionTable {
    let mut table = ResolutionTable::new();
    for source in source_names {
        let resolution = target_names
            .iter()
            .find(|target| target.contains(source.as_str()))
            .map_or(Resolution::Unresolved, |target| {
                Resolution::Resolved(target.clone())
            });
        if !resolution.is_resolved() {
            debug!(source = %source, "no target issue type contains this name");
        }
        table.push(source.as_str(), resolution);
    }
    info!(
        sources = source_names.len(),
        targets = target_names.len(),
        unresolved = table.unresolved().count(),
        "created issue type mapping"
    );
    table
}

/// Resolves source identifiers to target identifiers through both instances'
/// user directories.
///
/// Every identifier resolves: when the source account is gone or no target
/// account matches, the configured default identifier is used.
pub struct UserResolver<'a, S, T> {
    source: &'a S,
    target: &'a T,
    default_identifier: String,
    last_name_first: bool,
}

impl<'a, S: UserDirectory, T: UserDirectory> UserResolver<'a, S, T> {
    pub fn new(source: &'a S, target: &'a T, default_identifier: impl Into<String>) -> Self {
        Self {
            source,
            target,
            default_identifier: default_identifier.into(),
            last_name_first: false,
        }
    }

    /// Whether source display names read `Last, First`.
    #[must_use]
    pub fn with_last_name_first(mut self, enable: bool) -> Self {
        self.last_name_first = enable;
        self
    }

    pub fn default_identifier(&self) -> &str {
        &self.default_identifier
    }

    /// Checks that the default identifier exists on the target instance.
    pub fn verify_default(&self) -> bool {
        match self.target.find_by_identifier(&self.default_identifier) {
            Some(user) => {
                info!(default = %user.name, display_name = %user.display_name, "found default user");
                true
            }
            None => {
                warn!(
                    default = %self.default_identifier,
                    target = %self.target.describe(),
                    "default user not found on target"
                );
                false
            }
        }
    }

    /// Resolves every identifier, in sorted order.
    pub fn resolve(&self, identifiers: &IdentifierSet) -> ResolutionTable {
        let source_users = self.lookup_source_users(identifiers);

        let mut table = ResolutionTable::new();
        let mut defaulted = 0usize;
        for identifier in identifiers {
            let target = match source_users.get(identifier.as_str()) {
                Some(source_user) => self.match_on_target(source_user),
                None => {
                    warn!(
                        identifier = %identifier,
                        source = %self.source.describe(),
                        default = %self.default_identifier,
                        "user no longer exists on source, using default"
                    );
                    None
                }
            };
            let target = target.unwrap_or_else(|| {
                defaulted += 1;
                self.default_identifier.clone()
            });
            table.push(identifier.as_str(), Resolution::Resolved(target));
        }
        info!(
            identifiers = identifiers.len(),
            defaulted, "created user mapping"
        );
        table
    }

    fn lookup_source_users<'i>(
        &self,
        identifiers: &'i IdentifierSet,
    ) -> BTreeMap<&'i str, DirectoryUser> {
        let mut found = BTreeMap::new();
        for identifier in identifiers {
            if let Some(user) = self.source.find_by_identifier(identifier) {
                found.insert(identifier.as_str(), user);
            }
        }
        info!(
            found = found.len(),
            source = %self.source.describe(),
            "looked up source users"
        );
        found
    }

    fn match_on_target(&self, source_user: &DirectoryUser) -> Option<String> {
        let names = split_display_name(&source_user.display_name, self.last_name_first);
        let (first_name, last_name) = match names {
            Some((first, last)) => (Some(first), Some(last)),
            None => (None, None),
        };
        let query = UserQuery {
            identifier: None,
            email: source_user.email_address.clone(),
            first_name,
            last_name,
        };
        match find_user(self.target, &query) {
            Some(user) => {
                debug!(source = %source_user.name, target = %user.name, "matched user");
                Some(user.name)
            }
            None => {
                warn!(
                    source = %source_user.name,
                    target = %self.target.describe(),
                    default = %self.default_identifier,
                    "no matching user on target, using default"
                );
                None
            }
        }
    }
}
