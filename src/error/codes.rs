//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Suite tree errors
//! - 2xx: Selection errors
//! - 3xx: Config errors
//! - 4xx: Run control errors
//! - 9xx: Internal errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for JSON output.
///
/// Each variant maps to a numeric code (e.g., `SuiteLabelInvalid` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Suite tree errors (1xx)
    // ========================================
    /// E101: A suite or test case has an empty or malformed label
    SuiteLabelInvalid,
    /// E102: Two siblings share the same label
    SuiteLabelDuplicate,

    // ========================================
    // Selection errors (2xx)
    // ========================================
    /// E201: The selection matched no qualified test path
    SelectionEmpty,
    /// E202: A selection pattern could not be parsed
    SelectionInvalid,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E301: Config file or environment value is invalid
    ConfigInvalid,
    /// E302: Config file has invalid TOML syntax
    ConfigParseError,
    /// E303: Command-line arguments are invalid
    ArgumentInvalid,

    // ========================================
    // Run control errors (4xx)
    // ========================================
    /// E401: The run was interrupted before completion
    RunInterrupted,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    /// E901: Failed to read or write a file or stream
    IoError,
    /// E902: Failed to serialize output
    SerializationError,
}

impl ErrorCode {
    /// Numeric code for this error.
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::SuiteLabelInvalid => 101,
            Self::SuiteLabelDuplicate => 102,
            Self::SelectionEmpty => 201,
            Self::SelectionInvalid => 202,
            Self::ConfigInvalid => 301,
            Self::ConfigParseError => 302,
            Self::ArgumentInvalid => 303,
            Self::RunInterrupted => 401,
            Self::IoError => 901,
            Self::SerializationError => 902,
        }
    }

    /// Code string in `E###` form.
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Default recovery hint.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::SuiteLabelInvalid => "Give every suite and test case a non-empty label without '/'",
            Self::SuiteLabelDuplicate => "Rename one of the siblings so labels are unique",
            Self::SelectionEmpty => "Run with --list to see the available qualified test paths",
            Self::SelectionInvalid => "Check the glob syntax of the selection pattern",
            Self::ConfigInvalid => "Check the config file and HQC_UNIT_* environment variables",
            Self::ConfigParseError => "Fix the TOML syntax in the config file",
            Self::ArgumentInvalid => "Run with --help to see the accepted arguments",
            Self::RunInterrupted => "Re-run with the printed --seed to reproduce the run",
            Self::IoError => "Check that stdout and stderr are writable",
            Self::SerializationError => "Report this as a bug",
        }
    }

    /// Whether the user can fix this without changing the code under test.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::SerializationError)
    }

    /// Category name used in structured output.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::SuiteLabelInvalid | Self::SuiteLabelDuplicate => "suite",
            Self::SelectionEmpty | Self::SelectionInvalid => "selection",
            Self::ConfigInvalid | Self::ConfigParseError | Self::ArgumentInvalid => "config",
            Self::RunInterrupted => "run",
            Self::IoError | Self::SerializationError => "internal",
        }
    }

    /// Iterate over every error code.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::SuiteLabelInvalid,
            Self::SuiteLabelDuplicate,
            Self::SelectionEmpty,
            Self::SelectionInvalid,
            Self::ConfigInvalid,
            Self::ConfigParseError,
            Self::ArgumentInvalid,
            Self::RunInterrupted,
            Self::IoError,
            Self::SerializationError,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
