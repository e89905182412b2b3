use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::output::{ColorMode, OutputFormat};
use crate::error::{HarnessError, Result};
use crate::hqc::Variant;
use crate::testing::RunOptions;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "HQC_UNIT_CONFIG";

/// Project config file looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "hqc-unit.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub build: BuildConfig,
}

impl Config {
    /// Load defaults, then config files, then environment overrides.
    ///
    /// An explicit path (argument or `$HQC_UNIT_CONFIG`) replaces the global
    /// and project files and must exist.
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        Self::load_with(explicit_path, project_root, |key| std::env::var(key).ok())
    }

    /// [`Config::load`] with an injectable environment.
    pub fn load_with<F>(explicit_path: Option<&Path>, project_root: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| env(CONFIG_ENV).map(PathBuf::from));

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(HarnessError::Config(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch)?;
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global)?;
            }
            if let Some(project) = Self::load_patch(&project_root.join(PROJECT_CONFIG_FILE))? {
                config.merge_patch(project)?;
            }
        }

        config.apply_env_overrides(env)?;
        config.validate()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            debug!("no config directory on this platform");
            return Ok(None);
        };
        Self::load_patch(&dir.join("hqc-unit/config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        debug!(path = %path.display(), "loading config");
        let raw = std::fs::read_to_string(path)
            .map_err(|err| HarnessError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw).map_err(|source| HarnessError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) -> Result<()> {
        if let Some(patch) = patch.runner {
            self.runner.merge(patch)?;
        }
        if let Some(patch) = patch.output {
            self.output.merge(patch);
        }
        if let Some(patch) = patch.build {
            self.build.merge(patch);
        }
        Ok(())
    }

    fn apply_env_overrides<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = env("HQC_UNIT_SEED") {
            self.runner.seed = Some(
                parse_seed(&value)
                    .map_err(|err| HarnessError::Config(format!("HQC_UNIT_SEED: {err}")))?,
            );
        }
        if let Some(value) = env_parse::<u32>(&env, "HQC_UNIT_ITERATIONS")? {
            self.runner.iterations = value;
        }
        if let Some(value) = env_parse::<u64>(&env, "HQC_UNIT_TIMEOUT_MS")? {
            self.runner.timeout_ms = Some(value);
        }
        if let Some(value) = env_bool(&env, "HQC_UNIT_FAIL_FAST") {
            self.runner.fail_fast = value;
        }
        if let Some(value) = env_bool(&env, "HQC_UNIT_SHOW_PANICS") {
            self.runner.show_panics = value;
        }
        if let Some(value) = env("HQC_UNIT_VARIANT") {
            self.build.variant = value
                .parse()
                .map_err(|err| HarnessError::Config(format!("HQC_UNIT_VARIANT: {err}")))?;
        }
        if let Some(value) = env("HQC_UNIT_COLOR") {
            self.output.color = ColorMode::from_str(value.trim(), true)
                .map_err(|err| HarnessError::Config(format!("HQC_UNIT_COLOR: {err}")))?;
        }
        if let Some(value) = env("HQC_UNIT_OUTPUT_FORMAT") {
            self.output.format = OutputFormat::from_str(value.trim(), true)
                .map_err(|err| HarnessError::Config(format!("HQC_UNIT_OUTPUT_FORMAT: {err}")))?;
        }

        Ok(())
    }

    /// Reject values no layer may set.
    pub fn validate(&self) -> Result<()> {
        if self.runner.iterations == 0 {
            return Err(HarnessError::Config(
                "runner.iterations must be at least 1".to_string(),
            ));
        }
        if self.runner.timeout_ms == Some(0) {
            return Err(HarnessError::Config(
                "runner.timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Runner options for a run with `seed`.
    #[must_use]
    pub fn run_options(&self, seed: u64) -> RunOptions {
        RunOptions {
            fail_fast: self.runner.fail_fast,
            timeout: self.runner.timeout_ms.map(Duration::from_millis),
            iterations: self.runner.iterations,
            seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    pub fail_fast: bool,
    /// Per-case timeout; `None` disables it.
    pub timeout_ms: Option<u64>,
    pub iterations: u32,
    /// Fixed run seed; a random one is drawn when unset.
    pub seed: Option<u64>,
    /// Let panics print through the default hook.
    pub show_panics: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            timeout_ms: None,
            iterations: 1,
            seed: None,
            show_panics: false,
        }
    }
}

impl RunnerConfig {
    fn merge(&mut self, patch: RunnerPatch) -> Result<()> {
        if let Some(value) = patch.fail_fast {
            self.fail_fast = value;
        }
        if let Some(value) = patch.timeout_ms {
            self.timeout_ms = Some(value);
        }
        if let Some(value) = patch.iterations {
            self.iterations = value;
        }
        if let Some(value) = patch.seed {
            self.seed = Some(value.resolve()?);
        }
        if let Some(value) = patch.show_panics {
            self.show_panics = value;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color: ColorMode,
    /// Log verbosity, as if given that many `-v` flags.
    pub verbose: u8,
}

impl OutputConfig {
    fn merge(&mut self, patch: OutputPatch) {
        if let Some(value) = patch.format {
            self.format = value;
        }
        if let Some(value) = patch.color {
            self.color = value;
        }
        if let Some(value) = patch.verbose {
            self.verbose = value;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub variant: Variant,
}

impl BuildConfig {
    fn merge(&mut self, patch: BuildPatch) {
        if let Some(value) = patch.variant {
            self.variant = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    pub runner: Option<RunnerPatch>,
    pub output: Option<OutputPatch>,
    pub build: Option<BuildPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RunnerPatch {
    pub fail_fast: Option<bool>,
    pub timeout_ms: Option<u64>,
    pub iterations: Option<u32>,
    pub seed: Option<SeedPatch>,
    pub show_panics: Option<bool>,
}

/// A seed written as an integer or as a string such as `"0xC0FFEE"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SeedPatch {
    Number(u64),
    Text(String),
}

impl SeedPatch {
    fn resolve(self) -> Result<u64> {
        match self {
            Self::Number(value) => Ok(value),
            Self::Text(text) => parse_seed(&text)
                .map_err(|err| HarnessError::Config(format!("runner.seed: {err}"))),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputPatch {
    pub format: Option<OutputFormat>,
    pub color: Option<ColorMode>,
    pub verbose: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct BuildPatch {
    pub variant: Option<Variant>,
}

/// Parse a seed in decimal or `0x` hexadecimal.
pub fn parse_seed(value: &str) -> std::result::Result<u64, String> {
    let trimmed = value.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => trimmed.replace('_', "").parse::<u64>(),
    };
    parsed.map_err(|err| format!("invalid seed '{value}': {err}"))
}

/// Parse a duration such as `500ms`, `2s`, `1m` or a bare number of
/// milliseconds. Zero is rejected.
pub fn parse_duration(value: &str) -> std::result::Result<Duration, String> {
    let trimmed = value.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);
    let amount: u64 = digits
        .parse()
        .map_err(|_| format!("invalid duration '{value}'"))?;

    let duration = match unit.trim() {
        "" | "ms" => Duration::from_millis(amount),
        "s" => Duration::from_secs(amount),
        "m" => Duration::from_secs(amount.saturating_mul(60)),
        other => {
            return Err(format!(
                "invalid duration unit '{other}' in '{value}' (expected ms, s or m)"
            ));
        }
    };
    if duration.is_zero() {
        return Err("duration must be positive".to_string());
    }
    Ok(duration)
}

fn env_bool<F>(env: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    env(key).map(|value| {
        matches!(
            value.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_parse<T>(env: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|err| HarnessError::Config(format!("invalid {key} value {value}: {err}"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::ConfigFixture;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn no_env() -> impl Fn(&str) -> Option<String> {
        |_| None
    }

    #[test]
    fn config_defaults() {
        let config = Config::default();
        assert!(!config.runner.fail_fast);
        assert_eq!(config.runner.iterations, 1);
        assert_eq!(config.runner.timeout_ms, None);
        assert_eq!(config.runner.seed, None);
        assert_eq!(config.output.format, OutputFormat::Human);
        assert_eq!(config.build.variant, Variant::Hqc128);
    }

    #[test]
    fn project_file_is_merged() {
        let fixture = ConfigFixture::new();
        fixture.write(
            PROJECT_CONFIG_FILE,
            "[runner]\nfail_fast = true\niterations = 3\nseed = \"0xff\"\n\n[build]\nvariant = \"hqc-256\"\n",
        );

        let config = Config::load_with(None, &fixture.root, no_env()).unwrap();
        assert!(config.runner.fail_fast);
        assert_eq!(config.runner.iterations, 3);
        assert_eq!(config.runner.seed, Some(255));
        assert_eq!(config.build.variant, Variant::Hqc256);
        assert_eq!(config.runner.timeout_ms, None);
    }

    #[test]
    fn missing_project_file_is_fine() {
        let fixture = ConfigFixture::new();
        let config = Config::load_with(None, &fixture.root, no_env()).unwrap();
        assert_eq!(config.runner, RunnerConfig::default());
    }

    #[test]
    fn explicit_file_replaces_project_file() {
        let fixture = ConfigFixture::new();
        fixture.write(PROJECT_CONFIG_FILE, "[runner]\niterations = 9\n");
        let explicit = fixture.write("custom.toml", "[runner]\ntimeout_ms = 250\n");

        let config = Config::load_with(Some(&explicit), &fixture.root, no_env()).unwrap();
        assert_eq!(config.runner.iterations, 1);
        assert_eq!(config.runner.timeout_ms, Some(250));
    }

    #[test]
    fn explicit_file_from_env() {
        let fixture = ConfigFixture::new();
        let explicit = fixture.write("env.toml", "[output]\nformat = \"json\"\n");
        let path = explicit.display().to_string();

        let config =
            Config::load_with(None, &fixture.root, env_from(&[(CONFIG_ENV, path.as_str())])).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let fixture = ConfigFixture::new();
        let missing = fixture.root.join("nope.toml");
        let err = Config::load_with(Some(&missing), &fixture.root, no_env()).unwrap_err();
        assert!(matches!(err, HarnessError::Config(_)));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let fixture = ConfigFixture::new();
        fixture.write(PROJECT_CONFIG_FILE, "[runner\niterations = ");
        let err = Config::load_with(None, &fixture.root, no_env()).unwrap_err();
        assert!(matches!(err, HarnessError::ConfigParse { .. }));
        assert_eq!(err.exit_status(), crate::ExitStatus::Configuration);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let fixture = ConfigFixture::new();
        fixture.write(PROJECT_CONFIG_FILE, "[runner]\nparallel = true\n");
        assert!(Config::load_with(None, &fixture.root, no_env()).is_err());
    }

    #[test]
    fn env_overrides_file() {
        let fixture = ConfigFixture::new();
        fixture.write(PROJECT_CONFIG_FILE, "[runner]\niterations = 2\nfail_fast = true\n");

        let env = env_from(&[
            ("HQC_UNIT_ITERATIONS", "5"),
            ("HQC_UNIT_FAIL_FAST", "no"),
            ("HQC_UNIT_SEED", "42"),
            ("HQC_UNIT_TIMEOUT_MS", "1000"),
            ("HQC_UNIT_VARIANT", "hqc-192"),
            ("HQC_UNIT_COLOR", "never"),
        ]);
        let config = Config::load_with(None, &fixture.root, env).unwrap();
        assert_eq!(config.runner.iterations, 5);
        assert!(!config.runner.fail_fast);
        assert_eq!(config.runner.seed, Some(42));
        assert_eq!(config.runner.timeout_ms, Some(1000));
        assert_eq!(config.build.variant, Variant::Hqc192);
        assert_eq!(config.output.color, ColorMode::Never);
    }

    #[test]
    fn invalid_env_values_are_errors() {
        let fixture = ConfigFixture::new();
        for (key, value) in [
            ("HQC_UNIT_ITERATIONS", "many"),
            ("HQC_UNIT_SEED", "0xZZ"),
            ("HQC_UNIT_VARIANT", "hqc-1024"),
            ("HQC_UNIT_COLOR", "sometimes"),
        ] {
            let err = Config::load_with(None, &fixture.root, env_from(&[(key, value)]))
                .unwrap_err();
            assert!(matches!(err, HarnessError::Config(_)), "{key}");
        }
    }

    #[test]
    fn zero_iterations_rejected() {
        let fixture = ConfigFixture::new();
        fixture.write(PROJECT_CONFIG_FILE, "[runner]\niterations = 0\n");
        let err = Config::load_with(None, &fixture.root, no_env()).unwrap_err();
        assert!(err.to_string().contains("iterations"));
    }

    #[test]
    fn run_options_from_config() {
        let mut config = Config::default();
        config.runner.timeout_ms = Some(1500);
        config.runner.iterations = 4;
        let options = config.run_options(7);
        assert_eq!(options.timeout, Some(Duration::from_millis(1500)));
        assert_eq!(options.iterations, 4);
        assert_eq!(options.seed, 7);
    }

    #[test]
    fn parse_seed_forms() {
        assert_eq!(parse_seed("12345"), Ok(12_345));
        assert_eq!(parse_seed("0xdead_beef"), Ok(0xdead_beef));
        assert_eq!(parse_seed("0XFF"), Ok(255));
        assert_eq!(parse_seed(" 7 "), Ok(7));
        assert!(parse_seed("-1").is_err());
        assert!(parse_seed("seed").is_err());
    }

    #[test]
    fn parse_duration_forms() {
        assert_eq!(parse_duration("250"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration("500ms"), Ok(Duration::from_millis(500)));
        assert_eq!(parse_duration("2s"), Ok(Duration::from_secs(2)));
        assert_eq!(parse_duration("1m"), Ok(Duration::from_secs(60)));
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("3h").is_err());
        assert!(parse_duration("fast").is_err());
    }
}
