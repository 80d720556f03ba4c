//! Integration tests for split files and pruning.

use std::fmt::Write as _;
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;

use jira_model::Mapping;
use jira_output::{PruneOutcome, SplitOptions, Splitter, prune_empty_columns};
use proptest::prelude::*;

fn max_rows(value: usize) -> NonZeroUsize {
    NonZeroUsize::new(value).expect("non-zero")
}

fn data_rows(path: &Path) -> usize {
    fs::read_to_string(path).expect("read split").lines().count() - 1
}

#[test]
fn thousand_and_one_rows_split_into_three_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("export.csv");
    let mut text = String::from("Summary,Issue Type\n");
    for i in 0..1001 {
        let category = if i % 3 == 0 { "Bug" } else { "Story" };
        writeln!(text, "Issue {i},{category}").expect("format");
    }
    fs::write(&input, text).expect("write");

    let options = SplitOptions::new(dir.path().join("split")).with_max_rows(max_rows(500));
    let issue_types: Mapping = [("Story", "Story"), ("Bug", "Bug")].into_iter().collect();
    let outcome = Splitter::new(&options, &issue_types)
        .split_file(&input)
        .expect("split");

    let counts: Vec<usize> = outcome.files.iter().map(|path| data_rows(path)).collect();
    assert_eq!(counts, vec![500, 500, 1]);
    assert_eq!(outcome.rows, 1001);
    assert_eq!(outcome.categories, vec!["Story", "Bug"]);
    assert!(outcome.files[2].ends_with("export_split_3.csv"));
}

#[test]
fn split_files_follow_category_priority() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("updated.csv");
    fs::write(
        &input,
        "Summary,Issue Type,Assignee\n\
         login page,Story,john.doe\n\
         crash,Bug,anna.smith\n\
         Summary,Issue Type,Assignee\n\
         platform,Epic,john.doe\n\
         \"search, faster\",Story,anna.smith\n",
    )
    .expect("write");

    let options = SplitOptions::new(dir.path().join("split")).with_max_rows(max_rows(2));
    let issue_types: Mapping = [("Epic", "Epic"), ("User Story", "Story")]
        .into_iter()
        .collect();
    let outcome = Splitter::new(&options, &issue_types)
        .split_file(&input)
        .expect("split");
    assert_eq!(outcome.files.len(), 2);

    let first = fs::read_to_string(&outcome.files[0]).expect("read");
    let second = fs::read_to_string(&outcome.files[1]).expect("read");
    insta::assert_snapshot!(first, @r#"
    Summary,Issue Type,Assignee
    platform,Epic,john.doe
    login page,Story,john.doe
    "#);
    insta::assert_snapshot!(second, @r#"
    Summary,Issue Type,Assignee
    "search, faster",Story,anna.smith
    crash,Bug,anna.smith
    "#);
}

#[test]
fn prune_drops_columns_without_data() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("updated.csv");
    fs::write(
        &input,
        "Summary,Sprint,Assignee,Labels\n\
         one,,jdoe,\n\
         two,,,\n",
    )
    .expect("write");

    let outcome = prune_empty_columns(&input).expect("prune");
    let PruneOutcome::Written { path, removed } = outcome else {
        panic!("expected a pruned file");
    };
    assert_eq!(removed, vec!["Sprint", "Labels"]);
    assert!(path.ends_with("updated_noEmptyColumns.csv"));
    assert_eq!(
        fs::read_to_string(&path).expect("read"),
        "Summary,Assignee\none,jdoe\ntwo,\n"
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn split_sizes_cover_all_rows(rows in 1usize..60, limit in 1usize..20) {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("in.csv");
        let mut text = String::from("Issue Type\n");
        for i in 0..rows {
            writeln!(text, "T{}", i % 4).expect("format");
        }
        fs::write(&input, text).expect("write");

        let options = SplitOptions::new(dir.path().join("out")).with_max_rows(max_rows(limit));
        let mapping = Mapping::new();
        let outcome = Splitter::new(&options, &mapping).split_file(&input).expect("split");

        let counts: Vec<usize> = outcome.files.iter().map(|path| data_rows(path)).collect();
        prop_assert_eq!(counts.len(), rows.div_ceil(limit));
        prop_assert!(counts.iter().all(|&count| count >= 1 && count <= limit));
        prop_assert_eq!(counts.iter().sum::<usize>(), rows);
    }
}
