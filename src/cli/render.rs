//! Human and plain rendering of a run.

use std::io::{self, Write};
use std::time::Duration;

use colored::{ColoredString, Colorize};

use crate::cli::output::HumanLayout;
use crate::error::Result;
use crate::testing::outcome::SKIP_FILTERED;
use crate::testing::{Outcome, OutcomeKind, ReportEntry, RunObserver, RunPlan, RunReport};

/// Prints one line per test as the run progresses, then failures and a
/// summary.
pub struct ConsoleReporter<W: Write> {
    out: W,
    color: bool,
    show_filtered: bool,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleReporter<W> {
    pub const fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            show_filtered: false,
            error: None,
        }
    }

    /// Also print cases skipped because they were outside the selection.
    #[must_use]
    pub const fn show_filtered(mut self, show: bool) -> Self {
        self.show_filtered = show;
        self
    }

    fn line(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = writeln!(self.out, "{text}") {
            self.error = Some(err);
        }
    }

    fn status(&self, kind: OutcomeKind) -> String {
        let label = kind.label();
        if !self.color {
            return label.to_string();
        }
        let styled: ColoredString = match kind {
            OutcomeKind::Passed => label.green(),
            OutcomeKind::Failed => label.red().bold(),
            OutcomeKind::Skipped => label.yellow(),
            OutcomeKind::Errored => label.magenta().bold(),
        };
        styled.to_string()
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    /// Print failures and the summary. Returns the first write error seen
    /// during the run.
    pub fn finish(mut self, report: &RunReport) -> Result<W> {
        let failures: Vec<&ReportEntry> = report.failures().collect();
        if !failures.is_empty() {
            self.line("");
            self.line("failures:");
            for entry in failures {
                let reason = entry.outcome.reason().unwrap_or_default();
                let text = format!("    {}: {reason}", entry.path);
                self.line(&text);
            }
        }

        for warning in &report.warnings {
            let text = format!("warning: {warning}");
            self.line(&text);
        }
        if report.selected == 0 {
            self.line("no tests matched the selection");
        }

        let mut layout = HumanLayout::new();
        layout
            .blank()
            .section("Summary")
            .kv("passed", &report.counts.passed.to_string())
            .kv("failed", &report.counts.failed.to_string())
            .kv("errored", &report.counts.errored.to_string())
            .kv("skipped", &report.counts.skipped.to_string())
            .kv("seed", &format!("{:#x}", report.seed))
            .kv("time", &format_duration(report.duration));
        if report.interrupted {
            layout.push_line(self.status(OutcomeKind::Errored) + " run interrupted");
        }
        let summary = layout.build();
        self.line(&summary);

        if let Some(err) = self.error.take() {
            return Err(err.into());
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> RunObserver for ConsoleReporter<W> {
    fn on_run_start(&mut self, plan: &RunPlan) {
        let mut text = format!(
            "running {} of {} tests (seed {:#x}",
            plan.selected, plan.total, plan.seed
        );
        if plan.iterations > 1 {
            text.push_str(&format!(", {} iterations", plan.iterations));
        }
        text.push(')');
        self.line(&text);
    }

    fn on_case_finished(&mut self, entry: &ReportEntry) {
        let filtered = matches!(&entry.outcome, Outcome::Skipped(reason) if reason == SKIP_FILTERED);
        if filtered && !self.show_filtered {
            return;
        }

        let status = self.status(entry.outcome.kind());
        let text = if entry.executed {
            let timing = self.dim(&format!("[{}]", format_duration(entry.duration)));
            match entry.outcome.reason() {
                Some(reason) if entry.outcome.is_skipped() => {
                    format!("{status} {} ({reason}) {timing}", entry.path)
                }
                _ => format!("{status} {} {timing}", entry.path),
            }
        } else {
            let reason = entry.outcome.reason().unwrap_or_default();
            format!("{status} {} ({reason})", entry.path)
        };
        self.line(&text);
    }
}

/// `0.42 ms`, `12.30 ms`, `1.50 s`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs >= 1.0 {
        format!("{secs:.2} s")
    } else {
        format!("{:.2} ms", secs * 1_000.0)
    }
}
