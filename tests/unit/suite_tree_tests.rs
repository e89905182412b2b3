use hqc_unit::HarnessError;
use hqc_unit::error::TreeIssue;
use hqc_unit::hqc::Variant;
use hqc_unit::suites::build_tree;
use hqc_unit::testing::{Outcome, TestCase, compose, leaf};

#[test]
fn test_tree_paths_are_qualified_from_root() {
    let tree = build_tree(Variant::Hqc128).unwrap();
    let paths: Vec<String> = tree.cases().into_iter().map(|case| case.path).collect();
    assert_eq!(paths.first().map(String::as_str), Some("unit/galois field/add"));
    assert!(paths.contains(&"unit/reed solomon/detect errors".to_string()));
    assert!(paths.iter().all(|path| path.starts_with("unit/")));
    assert_eq!(paths.len(), tree.case_count());
}

#[test]
fn test_every_variant_builds_the_same_layout() {
    let layouts: Vec<Vec<String>> = Variant::ALL
        .iter()
        .map(|&variant| {
            build_tree(variant)
                .unwrap()
                .cases()
                .into_iter()
                .map(|case| case.path)
                .collect()
        })
        .collect();
    assert_eq!(layouts[0], layouts[1]);
    assert_eq!(layouts[1], layouts[2]);
}

#[test]
fn test_duplicate_leaf_labels_are_rejected() {
    let a = leaf("dup", vec![TestCase::new("x", || Outcome::Passed)]).unwrap();
    let b = leaf("dup", vec![TestCase::new("y", || Outcome::Passed)]).unwrap();
    let err = compose("unit", vec![a.into(), b.into()]).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Configuration {
            issue: TreeIssue::DuplicateSibling,
            ..
        }
    ));
}

#[test]
fn test_label_with_separator_is_rejected() {
    let err = leaf("a/b", Vec::new()).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Configuration {
            issue: TreeIssue::SeparatorInLabel,
            ..
        }
    ));
}
