//! Single-pass bulk substitution of mapped values.

use std::collections::HashSet;

use aho_corasick::{AhoCorasick, MatchKind};
use tracing::debug;

use jira_model::Mapping;

use crate::error::{Result, TransformError};

/// Replaces every mapped source value in a line with its target, in one scan.
///
/// Keys are taken from the mappings in the order given, each mapping in its
/// own insertion order. At any position the leftmost match wins; among keys
/// starting at the same position, the earlier key wins. Replaced text is
/// never scanned again, so `{"A": "B", "B": "C"}` turns `"A"` into `"B"`.
#[derive(Debug, Clone)]
pub struct Substituter {
    automaton: AhoCorasick,
    replacements: Vec<String>,
}

impl Substituter {
    /// Build from mappings in priority order. Empty keys are ignored and a
    /// key repeated in a later mapping keeps its first target.
    pub fn new(mappings: &[&Mapping]) -> Result<Self> {
        let mut patterns: Vec<&str> = Vec::new();
        let mut replacements = Vec::new();
        let mut seen = HashSet::new();
        for mapping in mappings {
            for (source, target) in mapping.iter() {
                if source.is_empty() {
                    continue;
                }
                if !seen.insert(source) {
                    debug!(source, "key already mapped by an earlier table");
                    continue;
                }
                patterns.push(source);
                replacements.push(target.to_string());
            }
        }

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .build(&patterns)
            .map_err(TransformError::Automaton)?;
        debug!(keys = patterns.len(), "built substitution automaton");

        Ok(Self {
            automaton,
            replacements,
        })
    }

    /// Number of distinct non-empty keys.
    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    pub fn replace_line(&self, line: &str) -> String {
        if self.replacements.is_empty() {
            return line.to_string();
        }
        self.automaton.replace_all(line, &self.replacements)
    }

    /// Same as [`Substituter::replace_line`] for a line that may not be
    /// valid UTF-8. Bytes outside the matched keys are copied unchanged.
    pub fn replace_bytes(&self, line: &[u8]) -> Vec<u8> {
        if self.replacements.is_empty() {
            return line.to_vec();
        }
        self.automaton.replace_all_bytes(line, &self.replacements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(entries: &[(&str, &str)]) -> Mapping {
        entries.iter().copied().collect()
    }

    #[test]
    fn replaced_text_is_not_rescanned() {
        let m = mapping(&[("A", "B"), ("B", "C")]);
        let sub = Substituter::new(&[&m]).expect("build");
        assert_eq!(sub.replace_line("A"), "B");
        assert_eq!(sub.replace_line("AB"), "BC");
    }

    #[test]
    fn earlier_key_wins_at_same_position() {
        let m = mapping(&[("jdoe", "john.doe"), ("jdoe2", "jane.doe")]);
        let sub = Substituter::new(&[&m]).expect("build");
        assert_eq!(sub.replace_line("jdoe2"), "john.doe2");
    }

    #[test]
    fn first_table_wins_for_shared_key() {
        let users = mapping(&[("Task", "task.owner")]);
        let types = mapping(&[("Task", "Work Item"), ("Bug", "Defect")]);
        let sub = Substituter::new(&[&users, &types]).expect("build");
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.replace_line("Task,Bug"), "task.owner,Defect");
    }

    #[test]
    fn empty_keys_are_ignored() {
        let m = mapping(&[("", "x"), ("a", "b")]);
        let sub = Substituter::new(&[&m]).expect("build");
        assert_eq!(sub.len(), 1);
        assert_eq!(sub.replace_line("cat"), "cbt");
    }

    #[test]
    fn invalid_utf8_bytes_pass_through() {
        let m = mapping(&[("alice", "alice.new")]);
        let sub = Substituter::new(&[&m]).expect("build");
        assert_eq!(
            sub.replace_bytes(b"caf\xe9,alice"),
            b"caf\xe9,alice.new".to_vec()
        );
    }

    #[test]
    fn no_mappings_leaves_lines_alone() {
        let sub = Substituter::new(&[]).expect("build");
        assert!(sub.is_empty());
        assert_eq!(sub.replace_line("unchanged"), "unchanged");
    }
}
