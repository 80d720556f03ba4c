use std::collections::HashMap;

/// Maps each header name to every ordinal position it occupies.
///
/// Tracker exports repeat names such as `Comment` or `Watchers` once per
/// value, so a name may resolve to many columns. Positions are kept in
/// left-to-right order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndex {
    positions: HashMap<String, Vec<usize>>,
}

impl ColumnIndex {
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut positions: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, name) in headers.iter().enumerate() {
            positions
                .entry(name.as_ref().to_string())
                .or_default()
                .push(position);
        }
        Self { positions }
    }

    /// Positions for `name`; empty when the header does not contain it.
    pub fn positions(&self, name: &str) -> &[usize] {
        self.positions.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First position of `name`, if present.
    pub fn first(&self, name: &str) -> Option<usize> {
        self.positions(name).first().copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_keep_all_positions_in_order() {
        let index = ColumnIndex::from_headers(&[
            "Summary", "Comment", "Watchers", "Comment", "Watchers", "Comment",
        ]);
        assert_eq!(index.positions("Comment"), &[1, 3, 5]);
        assert_eq!(index.positions("Watchers"), &[2, 4]);
        assert_eq!(index.first("Summary"), Some(0));
    }

    #[test]
    fn missing_name_has_no_positions() {
        let index = ColumnIndex::from_headers(&["Summary"]);
        assert!(index.positions("Assignee").is_empty());
        assert!(!index.contains("Assignee"));
        assert_eq!(index.first("Assignee"), None);
    }

    #[test]
    fn empty_header_builds_empty_index() {
        let index = ColumnIndex::from_headers::<String>(&[]);
        assert!(index.is_empty());
    }
}
