use std::time::Duration;

use hqc_unit::ExitStatus;
use hqc_unit::hqc::Variant;
use hqc_unit::suites::build_tree;
use hqc_unit::testing::{
    Outcome, RunOptions, Selection, SuiteRunner, TestCase, compose, leaf,
};

#[test]
fn test_selected_leaf_runs_and_others_are_filtered() {
    let tree = build_tree(Variant::Hqc128).unwrap();
    let selection = Selection::parse(&["reed solomon"]).unwrap();
    let runner = SuiteRunner::new(RunOptions {
        seed: 11,
        ..RunOptions::default()
    });
    let report = runner.run(&tree, &selection);

    assert_eq!(report.exit_status(), ExitStatus::Success);
    assert_eq!(report.entries.len(), tree.case_count());
    for entry in &report.entries {
        if entry.path.starts_with("unit/reed solomon/") {
            assert_eq!(entry.outcome, Outcome::Passed, "{}", entry.path);
        } else {
            assert_eq!(entry.outcome, Outcome::skipped("filtered"), "{}", entry.path);
        }
    }
}

#[test]
fn test_fail_fast_skips_remaining_selected_cases() {
    let tree = compose(
        "unit",
        vec![
            leaf(
                "first",
                vec![
                    TestCase::new("boom", || Outcome::failed("boom")),
                    TestCase::new("after", || Outcome::Passed),
                ],
            )
            .unwrap()
            .into(),
            leaf("second", vec![TestCase::new("later", || Outcome::Passed)])
                .unwrap()
                .into(),
        ],
    )
    .unwrap();
    let runner = SuiteRunner::new(RunOptions {
        fail_fast: true,
        ..RunOptions::default()
    });
    let report = runner.run(&tree, &Selection::all());

    assert_eq!(report.exit_status(), ExitStatus::TestsFailed);
    assert_eq!(report.executed, 1);
    assert_eq!(
        report.entry("unit/second/later").unwrap().outcome,
        Outcome::skipped("aborted")
    );
}

#[test]
fn test_timeout_does_not_block_the_run() {
    let tree = compose(
        "unit",
        vec![
            leaf(
                "slow",
                vec![
                    TestCase::new("sleeps", || {
                        std::thread::sleep(Duration::from_secs(5));
                        Outcome::Passed
                    }),
                    TestCase::new("quick", || Outcome::Passed),
                ],
            )
            .unwrap()
            .into(),
        ],
    )
    .unwrap();
    let runner = SuiteRunner::new(RunOptions {
        timeout: Some(Duration::from_millis(50)),
        ..RunOptions::default()
    });
    let report = runner.run(&tree, &Selection::all());

    assert_eq!(
        report.entry("unit/slow/sleeps").unwrap().outcome,
        Outcome::errored("timeout")
    );
    assert_eq!(report.entry("unit/slow/quick").unwrap().outcome, Outcome::Passed);
    assert_eq!(report.exit_status(), ExitStatus::TestsFailed);
}
