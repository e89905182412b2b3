//! Aggregated results of one run and the exit status derived from them.

use std::time::Duration;

use serde::{Serialize, Serializer};
use tracing::warn;

use crate::testing::outcome::{Outcome, OutcomeKind};

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitStatus {
    /// Every selected case passed or was deliberately skipped.
    Success,
    /// At least one case Failed or Errored.
    TestsFailed,
    /// The selection matched no case.
    SelectionEmpty,
    /// The suite tree, config or arguments were invalid.
    Configuration,
    /// Output could not be written.
    Internal,
    /// The run was interrupted.
    Interrupted,
}

impl ExitStatus {
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::TestsFailed => 1,
            Self::SelectionEmpty => 2,
            Self::Configuration => 3,
            Self::Internal => 4,
            Self::Interrupted => 130,
        }
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        Self::from(status.code())
    }
}

/// Counts per outcome kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errored: usize,
}

impl OutcomeCounts {
    fn add(&mut self, kind: OutcomeKind) {
        match kind {
            OutcomeKind::Passed => self.passed += 1,
            OutcomeKind::Failed => self.failed += 1,
            OutcomeKind::Skipped => self.skipped += 1,
            OutcomeKind::Errored => self.errored += 1,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.errored
    }
}

/// One `(qualified path, outcome)` record.
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub path: String,
    pub outcome: Outcome,
    /// Whether the action was invoked at least once.
    pub executed: bool,
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
}

impl ReportEntry {
    #[must_use]
    pub fn executed(path: impl Into<String>, outcome: Outcome, duration: Duration) -> Self {
        Self {
            path: path.into(),
            outcome,
            executed: true,
            duration,
        }
    }

    #[must_use]
    pub fn skipped(path: impl Into<String>, reason: &str) -> Self {
        Self {
            path: path.into(),
            outcome: Outcome::skipped(reason),
            executed: false,
            duration: Duration::ZERO,
        }
    }
}

fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    #[allow(clippy::cast_precision_loss)]
    let millis = duration.as_nanos() as f64 / 1_000_000.0;
    serializer.serialize_f64(millis)
}

/// Ordered record of every case visited in one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub seed: u64,
    /// Cases in the tree.
    pub total: usize,
    /// Cases matching the selection.
    pub selected: usize,
    /// Cases whose action was invoked.
    pub executed: usize,
    pub counts: OutcomeCounts,
    pub success: bool,
    pub interrupted: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
    pub entries: Vec<ReportEntry>,
}

impl RunReport {
    #[must_use]
    pub const fn new(seed: u64, total: usize, selected: usize) -> Self {
        Self {
            seed,
            total,
            selected,
            executed: 0,
            counts: OutcomeCounts {
                passed: 0,
                failed: 0,
                skipped: 0,
                errored: 0,
            },
            success: true,
            interrupted: false,
            warnings: Vec::new(),
            duration: Duration::ZERO,
            entries: Vec::new(),
        }
    }

    /// Append an entry, updating counts and the success flag.
    pub fn record(&mut self, entry: ReportEntry) {
        self.counts.add(entry.outcome.kind());
        if entry.executed {
            self.executed += 1;
        }
        if entry.outcome.is_failure() {
            self.success = false;
        }
        self.entries.push(entry);
    }

    pub fn mark_interrupted(&mut self) {
        self.interrupted = true;
    }

    /// Close the report after traversal.
    pub fn finish(&mut self, duration: Duration) {
        self.duration = duration;
        let ran = self.counts.passed + self.counts.failed + self.counts.errored;
        if self.selected > 0 && ran == 0 && !self.interrupted {
            let message = format!("all {} selected tests were skipped", self.selected);
            warn!("{message}");
            self.warnings.push(message);
        }
    }

    /// Entries that count against success.
    pub fn failures(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|entry| entry.outcome.is_failure())
    }

    /// Look up an entry by qualified path.
    #[must_use]
    pub fn entry(&self, path: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|entry| entry.path == path)
    }

    /// Exit status for this run.
    ///
    /// An interrupt wins over everything, then an empty selection, then
    /// failures.
    #[must_use]
    pub const fn exit_status(&self) -> ExitStatus {
        if self.interrupted {
            ExitStatus::Interrupted
        } else if self.selected == 0 {
            ExitStatus::SelectionEmpty
        } else if self.success {
            ExitStatus::Success
        } else {
            ExitStatus::TestsFailed
        }
    }
}
