use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::dispatcher::SetGlobalDefaultError;

/// Unified error type for logger construction and installation
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to open log output {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("a global logger is already installed: {0}")]
    AlreadyInstalled(#[from] SetGlobalDefaultError),
}

/// Convenience result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error category for configuration issues
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config file: {0}")]
    Toml(#[from] toml::de::Error),
}
