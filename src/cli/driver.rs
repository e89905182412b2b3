//! Glue between the parsed command line and the library: config loading,
//! listing, running and result output.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cli::Cli;
use crate::cli::output::{OutputFormat, RobotStatus, robot_response, write_json};
use crate::cli::render::ConsoleReporter;
use crate::config::Config;
use crate::error::{HarnessError, Result, suggest_similar_labels};
use crate::hqc::Variant;
use crate::suites;
use crate::testing::suite::PATH_SEPARATOR;
use crate::testing::{
    BuildMetadata, CompositeSuite, DiagnosticsReporter, ExitStatus, RunReport, Selection,
    SuiteRunner,
};

/// Load the layered config from the working directory and apply flags.
pub fn prepare(cli: &Cli) -> Result<Config> {
    let cwd = std::env::current_dir()?;
    prepare_in(cli, &cwd)
}

/// [`prepare`] rooted at `project_root`.
pub fn prepare_in(cli: &Cli, project_root: &Path) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref(), project_root)?;
    cli.apply_to(&mut config);
    config.validate()?;
    Ok(config)
}

/// Run (or list) the selected tests and report.
pub fn execute(cli: &Cli, config: &Config) -> Result<ExitStatus> {
    let format = config.output.format;
    config.output.color.apply(format);

    let variant = config.build.variant;
    let metadata = variant.metadata();
    let build = || suites::build_tree(variant);
    let tree = if cli.list {
        build()?
    } else if format.is_machine_readable() {
        announce_and_build(&mut DiagnosticsReporter::stderr(), &metadata, build)?
    } else {
        announce_and_build(&mut DiagnosticsReporter::stdout(), &metadata, build)?
    };
    let selection = Selection::parse(cli.selection.as_slice())?;

    if cli.list {
        let mut out = std::io::stdout().lock();
        return list(&tree, &selection, &cli.selection, variant, format, &mut out);
    }

    if !config.runner.show_panics {
        silence_panics();
    }

    let seed = config.runner.seed.unwrap_or_else(rand::random);
    debug!(seed, %variant, seeded = config.runner.seed.is_some(), "resolved run seed");

    let runner =
        SuiteRunner::new(config.run_options(seed)).with_interrupt(install_interrupt_handler());

    let hint = |report: &mut RunReport| {
        if report.selected == 0 {
            let near = near_misses(&tree, &cli.selection);
            if !near.is_empty() {
                report.warnings.push(format!("did you mean: {}", near.join(", ")));
            }
        }
    };

    let report = if format.is_machine_readable() {
        let mut report = runner.run(&tree, &selection);
        hint(&mut report);
        let payload = RunPayload {
            variant,
            metadata,
            selection: selection.describe(),
            report: &report,
        };
        let response = robot_response(run_status(&report), payload, report.warnings.clone());
        write_json(&mut std::io::stdout().lock(), &response)?;
        report
    } else {
        // Unlocked: tests may print to stdout while the run is in progress.
        let mut reporter = ConsoleReporter::new(std::io::stdout(), format.use_colors())
            .show_filtered(config.output.verbose > 0);
        let mut report = runner.run_with(&tree, &selection, &mut reporter);
        hint(&mut report);
        reporter.finish(&report)?;
        report
    };

    log_summary(&report);
    Ok(report.exit_status())
}

#[derive(Serialize)]
struct RunPayload<'a> {
    variant: Variant,
    metadata: BuildMetadata,
    selection: String,
    report: &'a RunReport,
}

#[derive(Serialize)]
struct ListPayload {
    variant: Variant,
    selection: String,
    tests: Vec<String>,
}

/// Print the banner, then assemble the tree, so a malformed tree is reported
/// after the build metadata.
fn announce_and_build<W, F>(
    banner: &mut DiagnosticsReporter<W>,
    metadata: &BuildMetadata,
    build: F,
) -> Result<CompositeSuite>
where
    W: Write,
    F: FnOnce() -> Result<CompositeSuite>,
{
    banner.report(metadata);
    build()
}

/// JSON status for a finished run. An interrupted run is reported as the
/// structured `RUN_INTERRUPTED` error rather than a plain failure.
fn run_status(report: &RunReport) -> RobotStatus {
    match report.exit_status() {
        ExitStatus::Success => RobotStatus::Ok,
        ExitStatus::Interrupted => RobotStatus::from(&HarnessError::Interrupted),
        _ => RobotStatus::Failed,
    }
}

/// Print the qualified paths `selection` matches, in traversal order.
///
/// An empty match is an error so that scripts can tell it apart from a
/// suite with no tests.
pub fn list<W: Write>(
    tree: &CompositeSuite,
    selection: &Selection,
    patterns: &[String],
    variant: Variant,
    format: OutputFormat,
    out: &mut W,
) -> Result<ExitStatus> {
    let tests: Vec<String> = tree
        .cases()
        .into_iter()
        .map(|case| case.path)
        .filter(|path| selection.matches(path))
        .collect();
    debug!(matched = tests.len(), total = tree.case_count(), "listing tests");

    if tests.is_empty() {
        return Err(HarnessError::selection_empty(
            selection.describe(),
            near_misses(tree, patterns),
        ));
    }

    if format.is_machine_readable() {
        let payload = ListPayload {
            variant,
            selection: selection.describe(),
            tests,
        };
        write_json(out, &robot_response(RobotStatus::Ok, payload, Vec::new()))?;
    } else {
        for path in &tests {
            writeln!(out, "{path}")?;
        }
        out.flush()?;
    }
    Ok(ExitStatus::Success)
}

/// Suite labels and case names resembling patterns that matched nothing.
fn near_misses(tree: &CompositeSuite, patterns: &[String]) -> Vec<String> {
    let paths: Vec<String> = tree.cases().into_iter().map(|case| case.path).collect();
    let mut labels: Vec<&str> = Vec::new();
    for path in &paths {
        for segment in path.split(PATH_SEPARATOR).skip(1) {
            if !labels.contains(&segment) {
                labels.push(segment);
            }
        }
    }

    let mut near: Vec<String> = Vec::new();
    for pattern in patterns {
        for label in suggest_similar_labels(pattern, &labels, 3) {
            if !near.contains(&label) {
                near.push(label);
            }
        }
    }
    near
}

fn log_summary(report: &RunReport) {
    let status = report.exit_status();
    if status != ExitStatus::Success {
        info!(
            ?status,
            exit_code = status.code(),
            seed = report.seed,
            "rerun with --seed to reproduce"
        );
    }
}

/// Route panic messages from test threads to the debug log instead of stderr.
fn silence_panics() {
    std::panic::set_hook(Box::new(|info| {
        let thread = thread::current();
        debug!(thread = thread.name().unwrap_or("<unnamed>"), "{info}");
    }));
}

/// Watch for Ctrl-C on a background thread.
///
/// The first interrupt sets the returned flag; the runner finishes the case
/// in progress and skips the rest. A second interrupt exits immediately.
fn install_interrupt_handler() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let handle = Arc::clone(&flag);

    let spawned = thread::Builder::new()
        .name("interrupt".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    warn!(error = %err, "cannot start signal runtime");
                    return;
                }
            };
            runtime.block_on(async move {
                if tokio::signal::ctrl_c().await.is_err() {
                    return;
                }
                warn!("interrupt received, finishing the current test");
                handle.store(true, Ordering::SeqCst);
                if tokio::signal::ctrl_c().await.is_ok() {
                    std::process::exit(i32::from(ExitStatus::Interrupted.code()));
                }
            });
        });
    if let Err(err) = spawned {
        warn!(error = %err, "cannot spawn interrupt handler");
    }
    flag
}
