//! hqc-unit - HQC unit test runner
//!
//! Runs the Galois field, Reed-Solomon and vector arithmetic suites for one
//! HQC parameter set and reports per-test outcomes.

use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use hqc_unit::cli::driver;
use hqc_unit::cli::output::{emit_json, robot_error_structured};
use hqc_unit::cli::{Cli, OutputFormat};
use hqc_unit::{ExitStatus, HarnessError};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitStatus::Configuration.into(),
            };
        }
    };

    let requested_json = cli.requested_format() == Some(OutputFormat::Json);
    let config = match driver::prepare(&cli) {
        Ok(config) => config,
        Err(e) => {
            init_tracing(cli.quiet, cli.verbose, requested_json);
            return report_error(&e, requested_json);
        }
    };

    let json = config.output.format.is_machine_readable();
    init_tracing(cli.quiet, config.output.verbose, json);

    match driver::execute(&cli, &config) {
        Ok(status) => status.into(),
        Err(e) => report_error(&e, json),
    }
}

fn report_error(err: &HarnessError, json: bool) -> ExitCode {
    if json {
        // JSON error output to stdout
        if emit_json(&robot_error_structured(err)).is_err() {
            eprintln!("Error: {err}");
        }
    } else {
        eprintln!("Error: {err}");
    }
    err.exit_status().into()
}

fn init_tracing(quiet: bool, verbose: u8, json: bool) {
    if quiet {
        return;
    }

    let filter = match verbose {
        0 => "warn,hqc_unit=info",
        1 => "info,hqc_unit=debug",
        2 => "debug,hqc_unit=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
