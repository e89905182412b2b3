//! CLI module - Command-line interface definition and driver
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::{Config, parse_duration, parse_seed};
use crate::hqc::Variant;

pub use output::{ColorMode, OutputFormat};

pub mod driver;
pub mod output;
pub mod render;

/// hqc-unit - Run the HQC unit test suites
#[derive(Parser, Debug)]
#[command(name = "hqc-unit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run only tests whose path matches (e.g. "reed solomon", "unit/vector/add", "unit/*/mul*")
    #[arg(value_name = "PATTERN")]
    pub selection: Vec<String>,

    /// List matching test paths instead of running them
    #[arg(short, long)]
    pub list: bool,

    /// Run seed, decimal or 0x-prefixed hex (default: random)
    #[arg(long, value_parser = parse_seed)]
    pub seed: Option<u64>,

    /// Run every selected test N times
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub iterations: Option<u32>,

    /// Per-test timeout (e.g. 500ms, 2s, 1m)
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Stop after the first failing test
    #[arg(long)]
    pub fail_fast: bool,

    /// Print panic messages from tests as they happen
    #[arg(long)]
    pub show_panics: bool,

    /// Parameter set under test
    #[arg(long, value_enum)]
    pub variant: Option<Variant>,

    /// Output format (human, plain, json)
    #[arg(long, short = 'O', value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Shorthand for --output-format=json
    #[arg(long, short = 'm')]
    pub machine: bool,

    /// Color mode: auto, always, never
    #[arg(long, value_name = "WHEN", value_enum)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Config file path (default: ./hqc-unit.toml and ~/.config/hqc-unit/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Format requested on the command line, if any.
    ///
    /// `--output-format` wins over `--machine`.
    #[must_use]
    pub fn requested_format(&self) -> Option<OutputFormat> {
        self.output_format
            .or_else(|| self.machine.then_some(OutputFormat::Json))
    }

    /// Layer command-line flags over a loaded config.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(seed) = self.seed {
            config.runner.seed = Some(seed);
        }
        if let Some(iterations) = self.iterations {
            config.runner.iterations = iterations;
        }
        if let Some(timeout) = self.timeout {
            config.runner.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        }
        if self.fail_fast {
            config.runner.fail_fast = true;
        }
        if self.show_panics {
            config.runner.show_panics = true;
        }
        if let Some(variant) = self.variant {
            config.build.variant = variant;
        }
        if let Some(format) = self.requested_format() {
            config.output.format = format;
        }
        if let Some(color) = self.color {
            config.output.color = color;
        }
        config.output.verbose = config.output.verbose.max(self.verbose);
    }
}
