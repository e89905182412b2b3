use std::path::Path;

use hqc_unit::ExitStatus;
use hqc_unit::cli::{ColorMode, OutputFormat};
use hqc_unit::config::Config;
use hqc_unit::hqc::Variant;
use tempfile::tempdir;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_explicit_file_replaces_project_file() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("hqc-unit.toml"), "[runner]\niterations = 9\n").unwrap();
    let explicit = dir.path().join("ci.toml");
    std::fs::write(
        &explicit,
        "[runner]\nfail_fast = true\n\n[output]\nformat = \"json\"\ncolor = \"never\"\n",
    )
    .unwrap();

    let config = Config::load_with(Some(&explicit), dir.path(), no_env).unwrap();
    assert_eq!(config.runner.iterations, 1);
    assert!(config.runner.fail_fast);
    assert_eq!(config.output.format, OutputFormat::Json);
    assert_eq!(config.output.color, ColorMode::Never);
}

#[test]
fn test_environment_overrides_files() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("hqc-unit.toml"),
        "[build]\nvariant = \"hqc-192\"\n",
    )
    .unwrap();
    let env = |key: &str| match key {
        "HQC_UNIT_VARIANT" => Some("hqc-256".to_string()),
        "HQC_UNIT_SEED" => Some("0xff".to_string()),
        _ => None,
    };

    let config = Config::load_with(None, dir.path(), env).unwrap();
    assert_eq!(config.build.variant, Variant::Hqc256);
    assert_eq!(config.runner.seed, Some(255));
}

#[test]
fn test_malformed_file_is_a_configuration_error() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("hqc-unit.toml"), "[runner\n").unwrap();
    let err = Config::load_with(None, dir.path(), no_env).unwrap_err();
    assert_eq!(err.exit_status(), ExitStatus::Configuration);
    assert!(err.to_string().contains("hqc-unit.toml"));
}

#[test]
fn test_missing_project_file_gives_defaults() {
    let config = Config::load_with(None, Path::new("/nonexistent/hqc-unit"), no_env).unwrap();
    assert_eq!(config.runner.iterations, 1);
    assert_eq!(config.runner.seed, None);
    assert_eq!(config.build.variant, Variant::Hqc128);
}
