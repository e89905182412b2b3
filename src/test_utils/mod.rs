//! Shared test utilities for hqc-unit.

pub mod fixtures;

use crate::testing::{
    CompositeSuite, Outcome, ReportEntry, RunObserver, RunPlan, TestCase, compose, leaf,
};

/// Case that always passes.
pub fn passing(name: &str) -> TestCase {
    TestCase::new(name, || Outcome::Passed)
}

/// Case that always fails with `reason`.
pub fn failing(name: &str, reason: &'static str) -> TestCase {
    TestCase::new(name, move || Outcome::failed(reason))
}

/// Reference tree:
/// `unit{ galois field: [t1 pass, t2 fail], reed solomon: [t3 pass], vector: [t4 pass] }`.
///
/// # Panics
///
/// Never; the labels are valid.
#[must_use]
pub fn scenario_tree() -> CompositeSuite {
    let build = || {
        compose(
            "unit",
            vec![
                leaf(
                    "galois field",
                    vec![passing("t1"), failing("t2", "t2 is broken")],
                )?
                .into(),
                leaf("reed solomon", vec![passing("t3")])?.into(),
                leaf("vector", vec![passing("t4")])?.into(),
            ],
        )
    };
    match build() {
        Ok(tree) => tree,
        Err(err) => panic!("scenario tree is invalid: {err}"),
    }
}

/// Observer that keeps everything it is told.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub plan: Option<RunPlan>,
    pub started: Vec<String>,
    pub finished: Vec<ReportEntry>,
}

impl RunObserver for RecordingObserver {
    fn on_run_start(&mut self, plan: &RunPlan) {
        self.plan = Some(*plan);
    }

    fn on_case_start(&mut self, path: &str) {
        self.started.push(path.to_string());
    }

    fn on_case_finished(&mut self, entry: &ReportEntry) {
        self.finished.push(entry.clone());
    }
}
