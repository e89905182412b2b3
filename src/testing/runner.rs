//! Sequential suite runner.
//!
//! Walks the tree depth-first in registration order and records one entry per
//! test case. Each invocation runs on its own thread with a fresh
//! [`CaseContext`], so a panic or a hang is contained to that case.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::testing::context::{CaseContext, derive_seed};
use crate::testing::outcome::{ERROR_TIMEOUT, Outcome, SKIP_ABORTED, SKIP_FILTERED, SKIP_INTERRUPTED};
use crate::testing::report::{ReportEntry, RunReport};
use crate::testing::selection::Selection;
use crate::testing::suite::{Action, CaseRef, CompositeSuite};

/// Options for controlling a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Stop executing after the first Failed or Errored case.
    pub fail_fast: bool,

    /// Per-invocation time limit.
    pub timeout: Option<Duration>,

    /// Invocations per selected case. Zero is treated as one.
    pub iterations: u32,

    /// Run seed from which every invocation seed is derived.
    pub seed: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            fail_fast: false,
            timeout: None,
            iterations: 1,
            seed: 0,
        }
    }
}

/// What the runner is about to do, announced before the first case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    pub seed: u64,
    pub total: usize,
    pub selected: usize,
    pub iterations: u32,
}

/// Receives progress while a run is in flight.
pub trait RunObserver {
    fn on_run_start(&mut self, _plan: &RunPlan) {}

    /// Called just before a selected case executes.
    fn on_case_start(&mut self, _path: &str) {}

    /// Called for every entry, executed or skipped, in traversal order.
    fn on_case_finished(&mut self, _entry: &ReportEntry) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Halt {
    Aborted,
    Interrupted,
}

impl Halt {
    const fn reason(self) -> &'static str {
        match self {
            Self::Aborted => SKIP_ABORTED,
            Self::Interrupted => SKIP_INTERRUPTED,
        }
    }
}

enum Delivery {
    Timeout,
    Lost,
}

/// Runner for a suite tree.
#[derive(Debug, Clone, Default)]
pub struct SuiteRunner {
    options: RunOptions,
    interrupt: Option<Arc<AtomicBool>>,
}

impl SuiteRunner {
    #[must_use]
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            interrupt: None,
        }
    }

    /// Stop the run once `flag` becomes true. The case in flight finishes;
    /// every case not yet started is recorded as interrupted.
    #[must_use]
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Run `tree` without progress reporting.
    #[must_use]
    pub fn run(&self, tree: &CompositeSuite, selection: &Selection) -> RunReport {
        self.run_with(tree, selection, &mut NoopObserver)
    }

    /// Run `tree`, reporting progress to `observer`.
    pub fn run_with(
        &self,
        tree: &CompositeSuite,
        selection: &Selection,
        observer: &mut dyn RunObserver,
    ) -> RunReport {
        let start = Instant::now();
        let cases = tree.cases();
        let selected = cases
            .iter()
            .filter(|case| selection.matches(&case.path))
            .count();

        let plan = RunPlan {
            seed: self.options.seed,
            total: cases.len(),
            selected,
            iterations: self.iterations(),
        };
        info!(
            seed = plan.seed,
            total = plan.total,
            selected = plan.selected,
            selection = %selection.describe(),
            "starting run"
        );
        observer.on_run_start(&plan);

        let mut report = RunReport::new(plan.seed, plan.total, plan.selected);
        let mut halt: Option<Halt> = None;

        for case in &cases {
            if halt != Some(Halt::Interrupted) && self.interrupted() {
                warn!(at = %case.path, "run interrupted");
                halt = Some(Halt::Interrupted);
                report.mark_interrupted();
            }

            let entry = match halt {
                Some(Halt::Interrupted) => ReportEntry::skipped(&case.path, SKIP_INTERRUPTED),
                _ if !selection.matches(&case.path) => {
                    ReportEntry::skipped(&case.path, SKIP_FILTERED)
                }
                Some(stop) => ReportEntry::skipped(&case.path, stop.reason()),
                None => {
                    observer.on_case_start(&case.path);
                    let entry = self.execute(case);
                    if self.options.fail_fast && entry.outcome.is_failure() {
                        info!(at = %case.path, "fail-fast: skipping remaining tests");
                        halt = Some(Halt::Aborted);
                    }
                    entry
                }
            };

            observer.on_case_finished(&entry);
            report.record(entry);
        }

        // An interrupt during the last case leaves nothing to skip.
        if halt != Some(Halt::Interrupted) && self.interrupted() {
            warn!("run interrupted");
            report.mark_interrupted();
        }

        report.finish(start.elapsed());
        info!(
            passed = report.counts.passed,
            failed = report.counts.failed,
            errored = report.counts.errored,
            skipped = report.counts.skipped,
            "run finished"
        );
        report
    }

    fn iterations(&self) -> u32 {
        self.options.iterations.max(1)
    }

    fn interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Run every iteration of one case; the first non-Passed outcome wins.
    ///
    /// A case whose iterations are cut short by an interrupt is recorded as
    /// executed but `Skipped("interrupted")`.
    fn execute(&self, case: &CaseRef<'_>) -> ReportEntry {
        let started = Instant::now();
        let action = case.case.action();
        let mut outcome = Outcome::Passed;

        for iteration in 0..self.iterations() {
            if iteration > 0 && self.interrupted() {
                debug!(path = %case.path, iteration, "stopping iterations after interrupt");
                outcome = Outcome::skipped(SKIP_INTERRUPTED);
                break;
            }
            let seed = derive_seed(self.options.seed, case.index, iteration);
            debug!(path = %case.path, iteration, seed, "invoking test");
            outcome = self.invoke(&case.path, &action, seed, iteration);
            if outcome != Outcome::Passed {
                break;
            }
        }

        let duration = started.elapsed();
        debug!(path = %case.path, outcome = %outcome.kind(), ?duration, "test finished");
        ReportEntry::executed(&case.path, outcome, duration)
    }

    /// Invoke `action` once on a dedicated thread.
    fn invoke(&self, path: &str, action: &Action, seed: u64, iteration: u32) -> Outcome {
        let (tx, rx) = mpsc::channel();
        let action = Arc::clone(action);
        let thread_path = path.to_string();

        let spawned = thread::Builder::new()
            .name(path.to_string())
            .spawn(move || {
                let mut ctx = CaseContext::new(thread_path, seed, iteration);
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| action(&mut ctx)))
                    .unwrap_or_else(|payload| Outcome::Failed(panic_message(payload.as_ref())));
                // The receiver is gone only after a timeout.
                let _ = tx.send(outcome);
            });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(err) => return Outcome::errored(format!("failed to start test thread: {err}")),
        };

        let received = match self.options.timeout {
            Some(limit) => rx.recv_timeout(limit).map_err(|err| match err {
                RecvTimeoutError::Timeout => Delivery::Timeout,
                RecvTimeoutError::Disconnected => Delivery::Lost,
            }),
            None => rx.recv().map_err(|_| Delivery::Lost),
        };

        match received {
            Ok(outcome) => {
                let _ = handle.join();
                outcome
            }
            Err(Delivery::Timeout) => {
                warn!(
                    path,
                    timeout_ms = self.options.timeout.map_or(0, |t| t.as_millis()),
                    "test exceeded timeout"
                );
                // Detached: the thread keeps running until the process exits.
                drop(handle);
                Outcome::errored(ERROR_TIMEOUT)
            }
            Err(Delivery::Lost) => {
                let _ = handle.join();
                Outcome::errored("test thread exited without reporting an outcome")
            }
        }
    }
}

/// Text of a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned());
    match message {
        Some(message) => format!("panicked: {message}"),
        None => "panicked with a non-string payload".to_string(),
    }
}
