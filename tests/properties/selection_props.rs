use proptest::prelude::*;

use hqc_unit::testing::{Outcome, Selection, SuiteRunner, TestCase, compose, leaf};

const LABELS: [&str; 4] = ["galois field", "reed solomon", "vector", "misc"];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn unselected_cases_are_filtered_and_never_run(
        picked in prop::collection::vec(0usize..LABELS.len(), 0..3),
    ) {
        let tree = compose(
            "unit",
            LABELS
                .iter()
                .map(|label| {
                    leaf(*label, vec![TestCase::new("t", || Outcome::Passed)])
                        .unwrap()
                        .into()
                })
                .collect(),
        )
        .unwrap();
        let patterns: Vec<&str> = picked.iter().map(|&i| LABELS[i]).collect();
        let selection = Selection::parse(&patterns).unwrap();
        let report = SuiteRunner::default().run(&tree, &selection);

        for entry in &report.entries {
            let label = entry.path.split('/').nth(1).unwrap();
            let wanted = patterns.is_empty() || patterns.contains(&label);
            if wanted {
                prop_assert_eq!(&entry.outcome, &Outcome::Passed);
                prop_assert!(entry.executed);
            } else {
                prop_assert_eq!(&entry.outcome, &Outcome::skipped("filtered"));
                prop_assert!(!entry.executed);
            }
        }
        prop_assert_eq!(report.selected, report.executed);
    }
}
