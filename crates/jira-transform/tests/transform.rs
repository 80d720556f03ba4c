//! Properties of substitution and category ordering.

use jira_model::Mapping;
use jira_transform::{RecordGroups, Substituter, order_by_category};
use proptest::prelude::*;

#[test]
fn category_priority_puts_unlisted_last() {
    let issue_types: Mapping = [("Epic", "Epic"), ("Story", "Story")].into_iter().collect();
    let rows = vec![
        vec!["1", "Story"],
        vec!["2", "Bug"],
        vec!["3", "Epic"],
        vec!["4", "Story"],
    ];
    let ordered = order_by_category(rows, |row| row[1], &issue_types);
    let ids: Vec<&str> = ordered.iter().map(|row| row[0]).collect();
    assert_eq!(ids, vec!["3", "1", "4", "2"]);
}

#[test]
fn substitution_of_export_line() {
    let users: Mapping = [("jdoe", "john.doe"), ("asmith", "anna.smith")]
        .into_iter()
        .collect();
    let types: Mapping = [("Sub-task", "Sub-task"), ("Bug", "Defect")].into_iter().collect();
    let sub = Substituter::new(&[&users, &types]).expect("build");
    let line = r#"Bug,jdoe,asmith,"2023-01-01;jdoe;ping [~asmith]""#;
    assert_eq!(
        sub.replace_line(line),
        r#"Defect,john.doe,anna.smith,"2023-01-01;john.doe;ping [~anna.smith]""#
    );
}

proptest! {
    // Every key maps to a target made only of characters that never occur in
    // keys, so any key left in the output came from the input untouched.
    #[test]
    fn substitution_is_single_pass(
        keys in proptest::collection::btree_set("[a-c]{1,3}", 1..6),
        line in "[a-c ]{0,40}",
    ) {
        let mapping: Mapping = keys
            .iter()
            .enumerate()
            .map(|(i, key)| (key.clone(), format!("<{i}>")))
            .collect();
        let sub = Substituter::new(&[&mapping]).expect("build");
        let once = sub.replace_line(&line);
        prop_assert_eq!(sub.replace_line(&once), once.clone());
    }

    #[test]
    fn target_equal_to_other_key_is_not_resubstituted(key in "[a-z]{1,5}") {
        let chained: Mapping = [(key.clone(), "X".to_string()), ("X".to_string(), "Y".to_string())]
            .into_iter()
            .collect();
        let sub = Substituter::new(&[&chained]).expect("build");
        prop_assert_eq!(sub.replace_line(&key), "X");
    }

    #[test]
    fn ordering_keeps_every_record(labels in proptest::collection::vec("[A-D]", 0..30)) {
        let preferred = ["C", "A"];
        let groups = RecordGroups::build(labels.iter().enumerate(), |(_, label)| label.as_str());
        let order = groups.priority_order(&preferred);
        let flat = groups.flatten(&order);
        prop_assert_eq!(flat.len(), labels.len());

        let mut ids: Vec<usize> = flat.iter().map(|(i, _)| *i).collect();
        ids.sort_unstable();
        prop_assert_eq!(ids, (0..labels.len()).collect::<Vec<_>>());
    }
}
