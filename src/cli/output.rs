use std::io::Write;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use console::style;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, HarnessError, Result};

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored per-test lines, failures and summary (default)
    #[default]
    Human,
    /// Same layout without colors
    Plain,
    /// One pretty-printed JSON document
    Json,
}

impl OutputFormat {
    #[must_use]
    pub const fn use_colors(&self) -> bool {
        matches!(self, Self::Human)
    }

    #[must_use]
    pub const fn is_machine_readable(&self) -> bool {
        matches!(self, Self::Json)
    }
}

/// When to emit ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Apply to both styling crates.
    pub fn apply(self, format: OutputFormat) {
        let enabled = match self {
            Self::Always => format.use_colors(),
            Self::Never => false,
            Self::Auto => {
                format.use_colors()
                    && console::colors_enabled()
                    && std::env::var_os("NO_COLOR").is_none()
            }
        };
        colored::control::set_override(enabled);
        console::set_colors_enabled(enabled);
    }
}

#[derive(Serialize)]
pub struct RobotResponse<T> {
    pub status: RobotStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub data: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotStatus {
    Ok,
    /// The run completed with failures
    Failed,
    /// Rich error with structured information
    Error {
        /// Error code enum value (e.g., "SUITE_LABEL_DUPLICATE")
        code: ErrorCode,
        /// Numeric error code (e.g., 102)
        numeric_code: u16,
        message: String,
        /// Actionable suggestion for recovery
        suggestion: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        context: Option<serde_json::Value>,
        recoverable: bool,
        category: String,
    },
}

pub fn robot_response<T: Serialize>(
    status: RobotStatus,
    data: T,
    warnings: Vec<String>,
) -> RobotResponse<T> {
    RobotResponse {
        status,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data,
        warnings,
    }
}

/// Create a robot error response from a [`HarnessError`].
pub fn robot_error_structured(err: &HarnessError) -> RobotResponse<serde_json::Value> {
    robot_response(RobotStatus::from(err), serde_json::Value::Null, Vec::new())
}

impl From<&HarnessError> for RobotStatus {
    fn from(err: &HarnessError) -> Self {
        let structured = err.to_structured();
        Self::Error {
            code: structured.code,
            numeric_code: structured.numeric_code,
            message: structured.message,
            suggestion: structured.suggestion,
            context: structured.context,
            recoverable: structured.recoverable,
            category: structured.category,
        }
    }
}

/// Pretty-print `value` as JSON to `out`.
pub fn write_json<T: Serialize, W: Write>(out: &mut W, value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)?;
    writeln!(out, "{payload}")?;
    Ok(())
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    write_json(&mut std::io::stdout().lock(), value)
}

pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanLayout {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 10,
        }
    }

    pub fn section(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push("-".repeat(text.len().max(3)));
        self
    }

    pub fn kv(&mut self, key: &str, value: &str) -> &mut Self {
        let padded = format!("{key:width$}", width = self.key_width);
        self.lines.push(format!("{} {value}", style(padded).dim()));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    #[must_use]
    pub fn build(&self) -> String {
        self.lines.join("\n")
    }
}
