//! Turning resolution results into usable mappings.
//!
//! Unresolved entries map to themselves, so values without a target match
//! pass through substitution unchanged instead of being dropped.

use tracing::{debug, info};

use jira_model::{LEGACY_NO_MATCH, Mapping, Resolution, ResolutionTable};

/// Cleans freshly resolved entries into a mapping.
///
/// A repeated source keeps its first resolution.
pub fn clean_resolutions(table: ResolutionTable) -> Mapping {
    let mut mapping = Mapping::new();
    let mut passthrough = 0usize;
    for (source, resolution) in table.into_entries() {
        let target = match resolution {
            Resolution::Resolved(target) => target,
            Resolution::Unresolved => {
                passthrough += 1;
                source.clone()
            }
        };
        if !mapping.insert_first(source.as_str(), target) {
            info!(source = %source, "duplicate mapping entry, using the first one");
        }
    }
    if passthrough > 0 {
        debug!(passthrough, "unresolved entries map to themselves");
    }
    mapping
}

/// Cleans a loaded mapping: targets holding the legacy no-match marker map
/// to their own source. Applying it twice changes nothing further.
pub fn clean_mapping(mapping: &Mapping) -> Mapping {
    mapping
        .iter()
        .map(|(source, target)| {
            if target == LEGACY_NO_MATCH {
                (source, source)
            } else {
                (source, target)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_maps_to_itself() {
        let mut table = ResolutionTable::new();
        table.push("Bug", Resolution::Resolved("Defect".to_string()));
        table.push("Spike", Resolution::Unresolved);

        let mapping = clean_resolutions(table);
        assert_eq!(
            mapping.iter().collect::<Vec<_>>(),
            vec![("Bug", "Defect"), ("Spike", "Spike")]
        );
    }

    #[test]
    fn first_resolution_wins_for_repeated_source() {
        let mut table = ResolutionTable::new();
        table.push("Bug", Resolution::Resolved("Defect".to_string()));
        table.push("Bug", Resolution::Resolved("Problem".to_string()));

        let mapping = clean_resolutions(table);
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("Bug"), Some("Defect"));
    }

    #[test]
    fn legacy_marker_is_replaced_with_key() {
        let mapping: Mapping = [("Epic", "Epic"), ("Spike", LEGACY_NO_MATCH)]
            .into_iter()
            .collect();
        let cleaned = clean_mapping(&mapping);
        assert_eq!(cleaned.get("Spike"), Some("Spike"));
        assert_eq!(cleaned.get("Epic"), Some("Epic"));
    }
}
