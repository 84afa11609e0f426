//! Record severities and their mapping onto `tracing` levels.
//!
//! Severities in decreasing order of precedence:
//! Error > Warn > Info > Debug

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing::Level;

use crate::error::ConfigError;

/// Minimum severity a record must have to be emitted.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    #[default]
    Info,
    #[serde(alias = "warning")]
    #[value(alias = "warning")]
    Warn,
    Error,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
    ];

    /// Lowercase name used in emitted records.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }

    /// The `tracing` level a record of this severity is emitted at.
    pub fn as_level(self) -> Level {
        match self {
            Severity::Debug => Level::DEBUG,
            Severity::Info => Level::INFO,
            Severity::Warn => Level::WARN,
            Severity::Error => Level::ERROR,
        }
    }

    /// Filter admitting this severity and everything above it.
    ///
    /// `Debug` maps straight to `LevelFilter::DEBUG`; the filter is the only
    /// threshold in the stack, so nothing downstream can coerce it to `INFO`.
    pub fn level_filter(self) -> LevelFilter {
        LevelFilter::from_level(self.as_level())
    }

    /// Severity of a `tracing` level. `TRACE` folds into `Debug`.
    pub fn from_level(level: &Level) -> Self {
        match *level {
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warn,
            Level::INFO => Severity::Info,
            _ => Severity::Debug,
        }
    }

    /// Whether a record at `level` passes a `self` threshold.
    pub fn admits(self, level: &Level) -> bool {
        self.level_filter() >= *level
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            other => Err(ConfigError::Invalid(format!("unknown severity `{other}`"))),
        }
    }
}

impl From<Severity> for Level {
    fn from(severity: Severity) -> Self {
        severity.as_level()
    }
}

impl From<Severity> for LevelFilter {
    fn from(severity: Severity) -> Self {
        severity.level_filter()
    }
}
