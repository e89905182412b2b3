use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::{TempDir, tempdir};

/// Command isolated from the user's config files and `HQC_UNIT_*` variables.
fn hqc_unit(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hqc-unit").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join(".config"))
        .env("NO_COLOR", "1");
    for key in [
        "HQC_UNIT_CONFIG",
        "HQC_UNIT_SEED",
        "HQC_UNIT_ITERATIONS",
        "HQC_UNIT_TIMEOUT_MS",
        "HQC_UNIT_FAIL_FAST",
        "HQC_UNIT_SHOW_PANICS",
        "HQC_UNIT_VARIANT",
        "HQC_UNIT_COLOR",
        "HQC_UNIT_OUTPUT_FORMAT",
        "RUST_LOG",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn test_cli_help() {
    let dir = tempdir().unwrap();
    hqc_unit(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_cli_version() {
    let dir = tempdir().unwrap();
    hqc_unit(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_full_run_passes_and_prints_banner() {
    let dir = tempdir().unwrap();
    hqc_unit(&dir)
        .args(["--seed", "1"])
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with(
            "----\n  HQC-128\n  N: 17669\n  Sec: 128 bits\n----\n\n",
        ))
        .stdout(predicate::str::contains("running 20 of 20 tests"))
        .stdout(predicate::str::contains("OK    unit/reed solomon/encode"))
        .stdout(predicate::str::contains("failed     0"));
}

#[test]
fn test_selection_runs_one_leaf() {
    let dir = tempdir().unwrap();
    hqc_unit(&dir)
        .args(["--seed", "1", "reed solomon"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("running 6 of 20 tests"))
        .stdout(predicate::str::contains("unit/vector/add").not());
}

#[test]
fn test_empty_selection_exits_2() {
    let dir = tempdir().unwrap();
    hqc_unit(&dir)
        .arg("nonexistent")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("no tests matched the selection"));
}

#[test]
fn test_blank_selection_is_configuration_error() {
    let dir = tempdir().unwrap();
    hqc_unit(&dir)
        .arg("")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("names no suite or test"));
}

#[test]
fn test_list_prints_paths() {
    let dir = tempdir().unwrap();
    hqc_unit(&dir)
        .args(["--list", "unit/galois field/*"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "unit/galois field/add\nunit/galois field/mul\n",
        ))
        .stdout(predicate::str::contains("reed solomon").not());
}

#[test]
fn test_list_with_no_match_exits_2() {
    let dir = tempdir().unwrap();
    hqc_unit(&dir)
        .args(["--list", "nonexistent"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No tests matched selection"));
}

#[test]
fn test_json_output_is_one_document() {
    let dir = tempdir().unwrap();
    let output = hqc_unit(&dir)
        .args(["-q", "-O", "json", "--seed", "0x2a", "vector"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["data"]["variant"], "hqc-128");
    assert_eq!(json["data"]["report"]["seed"], 42);
    assert_eq!(json["data"]["report"]["selected"], 7);
    assert_eq!(json["data"]["report"]["counts"]["passed"], 7);

    // The banner goes to stderr so stdout stays parseable.
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("  HQC-128\n"));
}

#[test]
fn test_variant_changes_banner() {
    let dir = tempdir().unwrap();
    hqc_unit(&dir)
        .args(["--variant", "hqc-256", "--seed", "3", "galois field"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("  HQC-256\n  N: 57637\n  Sec: 256 bits\n"));
}

#[test]
fn test_unknown_flag_is_configuration_error() {
    let dir = tempdir().unwrap();
    hqc_unit(&dir).arg("--no-such-flag").assert().code(3);
}

#[test]
fn test_invalid_project_config_is_configuration_error() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("hqc-unit.toml"), "[runner]\niterations = 0\n").unwrap();
    hqc_unit(&dir)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("iterations"));
}

#[test]
fn test_unknown_config_key_is_rejected() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("hqc-unit.toml"), "[runner]\nretries = 2\n").unwrap();
    hqc_unit(&dir).assert().code(3);
}

#[test]
fn test_project_config_selects_variant() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("hqc-unit.toml"),
        "[build]\nvariant = \"hqc-192\"\n",
    )
    .unwrap();
    hqc_unit(&dir)
        .args(["--seed", "5", "galois field"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("  HQC-192\n"));
}

#[test]
fn test_same_seed_gives_same_report() {
    let dir = tempdir().unwrap();
    let run = || {
        let output = hqc_unit(&dir)
            .args(["-q", "-m", "--seed", "77", "vector"])
            .output()
            .unwrap();
        let json: Value = serde_json::from_slice(&output.stdout).unwrap();
        let entries = json["data"]["report"]["entries"].as_array().unwrap().clone();
        entries
            .into_iter()
            .map(|entry| (entry["path"].clone(), entry["outcome"].clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}
