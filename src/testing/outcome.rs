//! Result classification of a single test case.

use serde::{Deserialize, Serialize};

/// Skip reason for cases outside the selection.
pub const SKIP_FILTERED: &str = "filtered";
/// Skip reason for selected cases not reached after a fail-fast stop.
pub const SKIP_ABORTED: &str = "aborted";
/// Skip reason for cases not reached after an interrupt.
pub const SKIP_INTERRUPTED: &str = "interrupted";
/// Error reason for a case that exceeded the per-case timeout.
pub const ERROR_TIMEOUT: &str = "timeout";

/// Outcome of running one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    /// An assertion did not hold.
    Failed(String),
    Skipped(String),
    /// The action could not complete normally.
    Errored(String),
}

impl Outcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped(reason.into())
    }

    pub fn errored(reason: impl Into<String>) -> Self {
        Self::Errored(reason.into())
    }

    #[must_use]
    pub const fn kind(&self) -> OutcomeKind {
        match self {
            Self::Passed => OutcomeKind::Passed,
            Self::Failed(_) => OutcomeKind::Failed,
            Self::Skipped(_) => OutcomeKind::Skipped,
            Self::Errored(_) => OutcomeKind::Errored,
        }
    }

    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Passed => None,
            Self::Failed(reason) | Self::Skipped(reason) | Self::Errored(reason) => Some(reason),
        }
    }

    /// Failed and Errored both count against overall success.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::Errored(_))
    }

    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Outcome without its reason, used for counting and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Passed,
    Failed,
    Skipped,
    Errored,
}

impl OutcomeKind {
    /// Fixed-width status label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "OK   ",
            Self::Failed => "FAIL ",
            Self::Skipped => "SKIP ",
            Self::Errored => "ERROR",
        }
    }
}

impl std::fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label().trim_end())
    }
}
