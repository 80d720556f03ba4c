//! Ordered source-to-target mapping tables.
//!
//! A [`Mapping`] keeps its entries in insertion order. That order is part of
//! the contract: it decides which key wins during bulk substitution and it
//! drives the category priority used when splitting output files.

use std::collections::{BTreeSet, HashMap};

/// Literal written by older tooling into persisted tables for entries that
/// had no target match.
pub const LEGACY_NO_MATCH: &str = "NO_TARGET_MATCH";

/// Unique identifiers found in the source records, iterated in sorted order.
pub type IdentifierSet = BTreeSet<String>;

/// Ordered `source -> target` association with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: Vec<(String, String)>,
    positions: HashMap<String, usize>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. An existing key keeps its position and takes the new
    /// target. Returns the previous target, if any.
    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) -> Option<String> {
        let source = source.into();
        let target = target.into();
        if let Some(&position) = self.positions.get(&source) {
            return Some(std::mem::replace(&mut self.entries[position].1, target));
        }
        self.positions.insert(source.clone(), self.entries.len());
        self.entries.push((source, target));
        None
    }

    /// Insert an entry only if the key is not present yet.
    ///
    /// Returns `false` when the key already existed; the stored target is left
    /// untouched in that case.
    pub fn insert_first(&mut self, source: impl Into<String>, target: impl Into<String>) -> bool {
        let source = source.into();
        if self.positions.contains_key(&source) {
            return false;
        }
        self.positions.insert(source.clone(), self.entries.len());
        self.entries.push((source, target.into()));
        true
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.positions
            .get(source)
            .map(|&position| self.entries[position].1.as_str())
    }

    pub fn contains_key(&self, source: &str) -> bool {
        self.positions.contains_key(source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(source, target)| (source.as_str(), target.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(source, _)| source.as_str())
    }

    /// Distinct targets in the order their first source entry was inserted.
    pub fn distinct_targets(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.entries
            .iter()
            .map(|(_, target)| target.as_str())
            .filter(|target| seen.insert(*target))
            .collect()
    }
}

impl<S, T> FromIterator<(S, T)> for Mapping
where
    S: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (source, target) in iter {
            mapping.insert(source, target);
        }
        mapping
    }
}

/// Outcome of resolving one source value against a target instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(String),
    Unresolved,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Ordered resolution results, carried until they are cleaned into a [`Mapping`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionTable {
    entries: Vec<(String, Resolution)>,
}

impl ResolutionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: impl Into<String>, resolution: Resolution) {
        self.entries.push((source.into(), resolution));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resolution)> {
        self.entries
            .iter()
            .map(|(source, resolution)| (source.as_str(), resolution))
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, resolution)| !resolution.is_resolved())
            .map(|(source, _)| source)
    }

    pub fn into_entries(self) -> Vec<(String, Resolution)> {
        self.entries
    }
}
