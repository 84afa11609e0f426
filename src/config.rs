//! Logger configuration.
//!
//! [`LoggingConfig::production`] is the starting preset; [`LoggingConfig::into_development`]
//! switches it to human-readable output. Configs can also be read from TOML or
//! from the environment.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::severity::Severity;

/// Environment variable holding the minimum severity.
pub const LEVEL_ENV: &str = "LOG_LEVEL";
/// Environment variable enabling development mode (`1`, `true`, `yes`, `on`).
pub const DEVELOPMENT_ENV: &str = "LOG_DEVELOPMENT";
/// Environment variable selecting the output: `stdout`, `stderr` or a file path.
pub const OUTPUT_ENV: &str = "LOG_OUTPUT";
/// Environment variable with per-target filter directives.
pub const TARGETS_ENV: &str = "RUST_LOG";

/// How records are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// One JSON object per line
    #[default]
    Json,
    /// Tab-separated, human-oriented lines
    Console,
}

/// Where records are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    Stdout,
    #[default]
    Stderr,
    /// Append to a file, creating it if needed
    File(PathBuf),
}

impl Output {
    fn parse(value: &str) -> Self {
        match value.trim() {
            "stdout" | "-" => Output::Stdout,
            "stderr" => Output::Stderr,
            path => Output::File(PathBuf::from(path)),
        }
    }
}

/// Per-callsite sampling: within each second the first `initial` records
/// pass, then every `thereafter`-th one. `thereafter = 0` drops the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sampling {
    pub initial: u64,
    pub thereafter: u64,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            initial: 100,
            thereafter: 100,
        }
    }
}

/// Names of the fixed fields of every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldKeys {
    pub level_key: String,
    pub time_key: String,
    pub caller_key: String,
    pub message_key: String,
    pub stacktrace_key: String,
}

impl Default for FieldKeys {
    fn default() -> Self {
        Self {
            level_key: "level".to_string(),
            time_key: "time".to_string(),
            caller_key: "line".to_string(),
            message_key: "msg".to_string(),
            stacktrace_key: "stacktrace".to_string(),
        }
    }
}

/// Complete logger configuration.
///
/// Deserializing starts from the production preset, or the development one
/// when `development = true`, and applies the keys that are present.
/// `sampling` and `stacktrace_level` also take `false` (off) or `true` (the
/// preset's value).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawConfig")]
pub struct LoggingConfig {
    pub level: Severity,
    pub development: bool,
    pub encoding: Encoding,
    pub output: Output,
    pub keys: FieldKeys,
    /// Annotate records with the caller's source location
    pub with_caller: bool,
    pub sampling: Option<Sampling>,
    /// Records at or above this severity carry a stack trace when backtraces
    /// are enabled (`RUST_BACKTRACE`)
    pub stacktrace_level: Option<Severity>,
    /// Keep records in memory until the buffer fills or the sink is flushed
    pub buffered: bool,
    /// Extra `RUST_LOG`-style directives, applied on top of `level`
    pub targets: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::production(Severity::default())
    }
}

/// A setting that is either switched on or off, or given explicitly.
#[derive(Deserialize)]
#[serde(untagged)]
enum Toggle<T> {
    Enabled(bool),
    Set(T),
}

impl<T: Default> Toggle<T> {
    fn resolve(setting: Option<Self>, preset: Option<T>) -> Option<T> {
        match setting {
            None => preset,
            Some(Toggle::Enabled(false)) => None,
            Some(Toggle::Enabled(true)) => preset.or_else(|| Some(T::default())),
            Some(Toggle::Set(value)) => Some(value),
        }
    }
}

// Config as written in a file; absent keys fall back to the preset
#[derive(Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    level: Option<Severity>,
    development: bool,
    encoding: Option<Encoding>,
    output: Option<Output>,
    #[serde(flatten)]
    keys: FieldKeys,
    with_caller: Option<bool>,
    sampling: Option<Toggle<Sampling>>,
    stacktrace_level: Option<Toggle<Severity>>,
    buffered: Option<bool>,
    targets: Option<String>,
}

impl From<RawConfig> for LoggingConfig {
    fn from(raw: RawConfig) -> Self {
        let level = raw.level.unwrap_or_default();
        let preset = if raw.development {
            Self::development(level)
        } else {
            Self::production(level)
        };

        Self {
            level,
            development: raw.development,
            encoding: raw.encoding.unwrap_or(preset.encoding),
            output: raw.output.unwrap_or(preset.output),
            keys: raw.keys,
            with_caller: raw.with_caller.unwrap_or(preset.with_caller),
            sampling: Toggle::resolve(raw.sampling, preset.sampling),
            stacktrace_level: Toggle::resolve(raw.stacktrace_level, preset.stacktrace_level),
            buffered: raw.buffered.unwrap_or(preset.buffered),
            targets: raw.targets.filter(|t| !t.trim().is_empty()),
        }
    }
}

impl LoggingConfig {
    /// Production preset: JSON to stderr, ISO-8601 `time`, caller under
    /// `line`, sampling enabled, stack traces on errors.
    pub fn production(level: Severity) -> Self {
        Self {
            level,
            development: false,
            encoding: Encoding::Json,
            output: Output::Stderr,
            keys: FieldKeys::default(),
            with_caller: true,
            sampling: Some(Sampling::default()),
            stacktrace_level: Some(Severity::Error),
            buffered: false,
            targets: None,
        }
    }

    /// Development preset: the production preset switched to console output.
    pub fn development(level: Severity) -> Self {
        Self::production(level).into_development()
    }

    /// Console encoding, no sampling, stack traces from warnings up.
    pub fn into_development(mut self) -> Self {
        self.development = true;
        self.encoding = Encoding::Console;
        self.sampling = None;
        self.stacktrace_level = Some(Severity::Warn);
        self
    }

    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    pub fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    pub fn with_sampling(mut self, sampling: Option<Sampling>) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_buffering(mut self, buffered: bool) -> Self {
        self.buffered = buffered;
        self
    }

    pub fn with_targets(mut self, directives: impl Into<String>) -> Self {
        self.targets = Some(directives.into());
        self
    }

    /// Parse a config from TOML text. Missing keys take the preset's values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: LoggingConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Build a config from `LOG_LEVEL`, `LOG_DEVELOPMENT`, `LOG_OUTPUT` and `RUST_LOG`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = match lookup(LEVEL_ENV) {
            Some(value) => value.parse()?,
            None => Severity::default(),
        };

        let mut config = Self::production(level);

        if let Some(value) = lookup(DEVELOPMENT_ENV) {
            if parse_flag(DEVELOPMENT_ENV, &value)? {
                config = config.into_development();
            }
        }

        if let Some(value) = lookup(OUTPUT_ENV) {
            if !value.trim().is_empty() {
                config.output = Output::parse(&value);
            }
        }

        config.targets = lookup(TARGETS_ENV).filter(|v| !v.trim().is_empty());

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the encoder cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let keys = [
            ("level_key", &self.keys.level_key),
            ("time_key", &self.keys.time_key),
            ("caller_key", &self.keys.caller_key),
            ("message_key", &self.keys.message_key),
            ("stacktrace_key", &self.keys.stacktrace_key),
        ];

        for (i, (name, key)) in keys.iter().enumerate() {
            if key.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{name} must not be empty")));
            }
            if let Some((other, _)) = keys[..i].iter().find(|(_, k)| k == key) {
                return Err(ConfigError::Invalid(format!(
                    "{name} and {other} are both `{key}`"
                )));
            }
        }

        if let Output::File(path) = &self.output {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("output file path is empty".to_string()));
            }
        }

        Ok(())
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::Invalid(format!(
            "{name} must be a boolean, got `{other}`"
        ))),
    }
}
