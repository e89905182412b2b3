use proptest::prelude::*;

use hqc_unit::testing::{
    CompositeSuite, Outcome, RunOptions, Selection, SuiteRunner, TestCase, compose, leaf,
};

/// Tree whose seeded cases fail depending on the PRNG stream they receive.
fn seeded_tree(leaves: usize, cases: usize) -> CompositeSuite {
    let children = (0..leaves)
        .map(|l| {
            let tests = (0..cases)
                .map(|c| {
                    TestCase::seeded(format!("case {c}"), |ctx| {
                        let draw: u8 = rand::Rng::random(ctx.rng());
                        if draw % 3 == 0 {
                            Outcome::failed(format!("drew {draw}"))
                        } else {
                            Outcome::Passed
                        }
                    })
                })
                .collect();
            leaf(format!("leaf {l}"), tests).unwrap().into()
        })
        .collect();
    compose("unit", children).unwrap()
}

fn outcomes(tree: &CompositeSuite, seed: u64, fail_fast: bool) -> Vec<(String, Outcome)> {
    let runner = SuiteRunner::new(RunOptions {
        seed,
        fail_fast,
        ..RunOptions::default()
    });
    runner
        .run(tree, &Selection::all())
        .entries
        .into_iter()
        .map(|entry| (entry.path, entry.outcome))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn same_seed_same_outcomes(seed in any::<u64>(), leaves in 1usize..4, cases in 0usize..5) {
        let tree = seeded_tree(leaves, cases);
        prop_assert_eq!(outcomes(&tree, seed, false), outcomes(&tree, seed, false));
    }

    #[test]
    fn every_case_is_reported_once(seed in any::<u64>(), leaves in 1usize..4, cases in 0usize..5, fail_fast in any::<bool>()) {
        let tree = seeded_tree(leaves, cases);
        let report = outcomes(&tree, seed, fail_fast);
        prop_assert_eq!(report.len(), leaves * cases);
    }

    #[test]
    fn fail_fast_runs_nothing_after_first_failure(seed in any::<u64>(), leaves in 1usize..4, cases in 1usize..5) {
        let tree = seeded_tree(leaves, cases);
        let report = outcomes(&tree, seed, true);
        if let Some(first) = report.iter().position(|(_, outcome)| outcome.is_failure()) {
            for (_, outcome) in &report[first + 1..] {
                prop_assert_eq!(outcome, &Outcome::skipped("aborted"));
            }
        }
    }
}
