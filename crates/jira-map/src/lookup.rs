//! The user directory of a tracker instance, as seen by the resolvers.

use std::collections::BTreeSet;
use std::fmt::Display;

use tracing::{debug, warn};

use jira_model::{DirectoryUser, UserQuery};

/// Read access to the accounts and issue types of one tracker instance.
///
/// Implementors only provide the raw substring search; the precedence used to
/// pick a single user lives in [`find_user`].
pub trait UserDirectory {
    type Error: Display;

    /// Users whose login, display name, or email contains `query`.
    fn search_users(&self, query: &str) -> Result<Vec<DirectoryUser>, Self::Error>;

    /// Issue type names available to `project_key`.
    fn issue_type_names(&self, project_key: &str) -> Result<BTreeSet<String>, Self::Error>;

    /// Human-readable name of the instance for log messages.
    fn describe(&self) -> String;

    fn find_by_identifier(&self, identifier: &str) -> Option<DirectoryUser>
    where
        Self: Sized,
    {
        find_user(self, &UserQuery::by_identifier(identifier))
    }
}

/// Finds at most one user matching `query`.
///
/// Precedence:
/// 1. identifier: a single hit, or the hit whose login equals the identifier
/// 2. email: a single hit, or the first hit whose display name contains the
///    last name (first name when no last name is given)
/// 3. name: search by last name (or first name); a single hit, or the first
///    hit whose display name also contains the first name
///
/// A failed search counts as no hits.
pub fn find_user<D: UserDirectory>(directory: &D, query: &UserQuery) -> Option<DirectoryUser> {
    if let Some(identifier) = query.identifier.as_deref() {
        let users = search(directory, identifier);
        if users.len() == 1 {
            return users.into_iter().next();
        }
        // The search also matches emails and display names, so "john.doe"
        // may return "john.f.doe" as well.
        if let Some(user) = users.into_iter().find(|user| user.name == identifier) {
            return Some(user);
        }
    }

    let name_hint = query.last_name.as_deref().or(query.first_name.as_deref());

    if let Some(email) = query.email.as_deref() {
        let users = search(directory, email);
        if users.len() == 1 {
            return users.into_iter().next();
        }
        if let Some(name) = name_hint {
            let mut with_name = filter_by_display_name(users, name);
            if with_name.len() > 1 {
                warn!(
                    email,
                    chosen = %with_name[0].name,
                    "multiple users share this email, using the first one"
                );
            }
            if !with_name.is_empty() {
                return Some(with_name.swap_remove(0));
            }
        }
    }

    if let Some(name) = name_hint {
        let users = search(directory, name);
        if users.len() == 1 {
            return users.into_iter().next();
        }
        if let (Some(first), Some(last)) = (query.first_name.as_deref(), query.last_name.as_deref()) {
            let mut with_both = filter_by_display_name(users, first);
            if with_both.len() > 1 {
                warn!(
                    first_name = first,
                    last_name = last,
                    chosen = %with_both[0].name,
                    "multiple users share this name, using the first one"
                );
            }
            if !with_both.is_empty() {
                return Some(with_both.swap_remove(0));
            }
        }
        debug!(?query, "no users found");
    }

    None
}

fn search<D: UserDirectory>(directory: &D, query: &str) -> Vec<DirectoryUser> {
    match directory.search_users(query) {
        Ok(users) => {
            debug!(query, count = users.len(), directory = %directory.describe(), "user search");
            users
        }
        Err(error) => {
            warn!(query, %error, directory = %directory.describe(), "user search failed");
            Vec::new()
        }
    }
}

fn filter_by_display_name(users: Vec<DirectoryUser>, name: &str) -> Vec<DirectoryUser> {
    users
        .into_iter()
        .filter(|user| user.display_name.contains(name))
        .collect()
}
