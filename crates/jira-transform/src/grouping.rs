//! Grouping records by category and ordering the groups by priority.

use std::collections::HashMap;

use tracing::warn;

use jira_model::Mapping;

/// Records grouped by category, each group in encounter order.
#[derive(Debug, Clone)]
pub struct RecordGroups<R> {
    groups: Vec<(String, Vec<R>)>,
    positions: HashMap<String, usize>,
}

impl<R> Default for RecordGroups<R> {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<R> RecordGroups<R> {
    /// Groups `records` in one pass; `category` reads a record's label.
    pub fn build<I, F>(records: I, category: F) -> Self
    where
        I: IntoIterator<Item = R>,
        F: Fn(&R) -> &str,
    {
        let mut groups = Self::default();
        for record in records {
            let label = category(&record);
            let position = match groups.positions.get(label) {
                Some(&position) => position,
                None => {
                    let position = groups.groups.len();
                    groups.positions.insert(label.to_string(), position);
                    groups.groups.push((label.to_string(), Vec::new()));
                    position
                }
            };
            groups.groups[position].1.push(record);
        }
        groups
    }

    /// Categories in first-seen order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(label, _)| label.as_str())
    }

    pub fn count(&self, category: &str) -> usize {
        self.positions
            .get(category)
            .map_or(0, |&position| self.groups[position].1.len())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// `preferred` categories first, then every remaining category present in
    /// the records in first-seen order. The remaining ones are logged.
    pub fn priority_order(&self, preferred: &[&str]) -> Vec<String> {
        let mut order: Vec<String> = Vec::new();
        for category in preferred {
            if !order.iter().any(|known| known == category) {
                order.push((*category).to_string());
            }
        }
        let unlisted: Vec<&str> = self
            .categories()
            .filter(|category| !preferred.contains(category))
            .collect();
        if !unlisted.is_empty() {
            warn!(
                categories = ?unlisted,
                "categories missing from the issue type mapping are appended last"
            );
            order.extend(unlisted.into_iter().map(str::to_string));
        }
        order
    }

    /// Concatenates the groups in `order`. Categories without records are
    /// skipped; groups not named in `order` are dropped.
    pub fn flatten(mut self, order: &[String]) -> Vec<R> {
        let mut records = Vec::new();
        for category in order {
            if let Some(position) = self.positions.remove(category) {
                records.append(&mut self.groups[position].1);
            }
        }
        records
    }
}

/// Orders `records` by the issue type mapping's distinct targets, appending
/// categories the mapping does not mention.
pub fn order_by_category<R, I, F>(records: I, category: F, issue_types: &Mapping) -> Vec<R>
where
    I: IntoIterator<Item = R>,
    F: Fn(&R) -> &str,
{
    let groups = RecordGroups::build(records, category);
    let order = groups.priority_order(&issue_types.distinct_targets());
    groups.flatten(&order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(labels: &[&str]) -> Vec<(usize, String)> {
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| (i, (*label).to_string()))
            .collect()
    }

    #[test]
    fn grouping_is_stable() {
        let groups = RecordGroups::build(rows(&["Story", "Bug", "Story", "Bug"]), |r| r.1.as_str());
        assert_eq!(groups.categories().collect::<Vec<_>>(), vec!["Story", "Bug"]);
        assert_eq!(groups.count("Story"), 2);
        let flat = groups.flatten(&["Bug".to_string(), "Story".to_string()]);
        let ids: Vec<usize> = flat.iter().map(|r| r.0).collect();
        assert_eq!(ids, vec![1, 3, 0, 2]);
    }

    #[test]
    fn unlisted_categories_are_appended_in_first_seen_order() {
        let groups = RecordGroups::build(rows(&["Story", "Bug", "Epic", "Spike"]), |r| r.1.as_str());
        assert_eq!(
            groups.priority_order(&["Epic", "Story", "Epic"]),
            vec!["Epic", "Story", "Bug", "Spike"]
        );
    }

    #[test]
    fn listed_category_without_rows_contributes_nothing() {
        let mapping: Mapping = [("Initiative", "Initiative"), ("Story", "Story")]
            .into_iter()
            .collect();
        let ordered = order_by_category(rows(&["Story", "Bug"]), |r| r.1.as_str(), &mapping);
        let labels: Vec<&str> = ordered.iter().map(|r| r.1.as_str()).collect();
        assert_eq!(labels, vec!["Story", "Bug"]);
    }
}
