//! Error handling for hqc-unit.
//!
//! This module provides:
//! - [`HarnessError`]: The main error enum for driver operations
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Rich error type with suggestion and context
//!
//! Per-test failures are not errors: they are recorded as outcomes by the
//! runner and never propagate through this type.

mod codes;
mod suggestions;

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::testing::ExitStatus;

pub use codes::ErrorCode;
pub use suggestions::{suggest_for_error, suggest_similar_labels};

/// Main error type for hqc-unit operations.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Malformed suite tree, detected before any test runs.
    #[error("Configuration error at '{label}': {issue}")]
    Configuration { label: String, issue: TreeIssue },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Config parse error in {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No tests matched selection: {selection}")]
    SelectionEmpty {
        selection: String,
        /// Labels close to the patterns, for the suggestion.
        did_you_mean: Vec<String>,
    },

    #[error("Run interrupted")]
    Interrupted,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What is wrong with a suite tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeIssue {
    /// Suite label or test case name is empty.
    EmptyLabel,
    /// Label contains the path separator.
    SeparatorInLabel,
    /// Two children of one composite share a label.
    DuplicateSibling,
    /// Two test cases of one leaf share a name.
    DuplicateCase,
}

impl std::fmt::Display for TreeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::EmptyLabel => "label must not be empty",
            Self::SeparatorInLabel => "label must not contain '/'",
            Self::DuplicateSibling => "duplicate sibling label",
            Self::DuplicateCase => "duplicate test case name in leaf suite",
        };
        f.write_str(text)
    }
}

impl HarnessError {
    /// Build a configuration error for `label`.
    pub fn configuration(label: impl Into<String>, issue: TreeIssue) -> Self {
        Self::Configuration {
            label: label.into(),
            issue,
        }
    }

    pub fn selection_empty(selection: impl Into<String>, did_you_mean: Vec<String>) -> Self {
        Self::SelectionEmpty {
            selection: selection.into(),
            did_you_mean,
        }
    }

    /// Get the error code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Configuration {
                issue: TreeIssue::DuplicateSibling | TreeIssue::DuplicateCase,
                ..
            } => ErrorCode::SuiteLabelDuplicate,
            Self::Configuration { .. } => ErrorCode::SuiteLabelInvalid,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Self::InvalidArgument(_) => ErrorCode::SelectionInvalid,
            Self::SelectionEmpty { .. } => ErrorCode::SelectionEmpty,
            Self::Interrupted => ErrorCode::RunInterrupted,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::SerializationError,
        }
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::Configuration { label, issue } => {
                Some(serde_json::json!({ "label": label, "issue": issue }))
            }
            Self::SelectionEmpty {
                selection,
                did_you_mean,
            } => {
                let mut context = serde_json::json!({ "selection": selection });
                if !did_you_mean.is_empty() {
                    context["did_you_mean"] = serde_json::json!(did_you_mean);
                }
                Some(context)
            }
            Self::ConfigParse { path, .. } => {
                Some(serde_json::json!({ "path": path.display().to_string() }))
            }
            _ => None,
        }
    }

    /// Process exit status reserved for this error.
    #[must_use]
    pub const fn exit_status(&self) -> ExitStatus {
        match self {
            Self::Configuration { .. }
            | Self::Config(_)
            | Self::ConfigParse { .. }
            | Self::InvalidArgument(_) => ExitStatus::Configuration,
            Self::SelectionEmpty { .. } => ExitStatus::SelectionEmpty,
            Self::Interrupted => ExitStatus::Interrupted,
            Self::Io(_) | Self::Json(_) => ExitStatus::Internal,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_harness_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "SUITE_LABEL_DUPLICATE")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 102)
    pub numeric_code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Whether this error is potentially recoverable by the user
    pub recoverable: bool,

    /// Error category (e.g., "suite", "config")
    pub category: String,
}

impl StructuredError {
    /// Create a new structured error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            numeric_code: code.numeric(),
            suggestion: code.suggestion().to_string(),
            context: None,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
            code,
            message: message.into(),
        }
    }

    /// Create a structured error from a [`HarnessError`].
    #[must_use]
    pub fn from_harness_error(err: &HarnessError) -> Self {
        let code = err.code();
        let mut structured = Self::new(code, err.to_string());
        structured.context = err.context();
        structured.suggestion = suggest_for_error(code, structured.context.as_ref());
        structured
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Result type alias using `HarnessError`.
pub type Result<T> = std::result::Result<T, HarnessError>;
