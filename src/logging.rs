use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::config::LoggingConfig;
use crate::error::Result;
use crate::logger::Logger;
use crate::severity::Severity;
use crate::sink::LogSink;

// Sink of the installed global logger, flushed by `cleanup`
static INSTALLED: OnceCell<Arc<LogSink>> = OnceCell::new();

/// Initialize the process-wide logger.
///
/// This should be the **first** call in `main` before any logging occurs.
/// Starts from the production preset (JSON to stderr, ISO-8601 `time`,
/// caller under `line`) and switches to console output when
/// `development_mode` is set. Any construction error is returned as-is;
/// there is no sink to report it to, so callers usually treat it as fatal.
///
/// Pair with [`cleanup`] (or use [`init_guarded`]) so buffered records are
/// written before the process exits.
pub fn init(level: Severity, development_mode: bool) -> Result<()> {
    let config = if development_mode {
        LoggingConfig::development(level)
    } else {
        LoggingConfig::production(level)
    };
    init_with_config(&config)
}

/// Initialize the process-wide logger from a full configuration.
pub fn init_with_config(config: &LoggingConfig) -> Result<()> {
    Logger::build(config)?.install()
}

/// Initialize from `LOG_LEVEL`, `LOG_DEVELOPMENT`, `LOG_OUTPUT` and `RUST_LOG`.
pub fn init_from_env() -> Result<()> {
    let config = LoggingConfig::from_env()?;
    init_with_config(&config)
}

/// Like [`init`], returning a guard that runs [`cleanup`] when dropped.
pub fn init_guarded(level: Severity, development_mode: bool) -> Result<CleanupGuard> {
    init(level, development_mode)?;
    Ok(CleanupGuard::new())
}

pub(crate) fn install(logger: &Logger) -> Result<()> {
    tracing::dispatcher::set_global_default(logger.dispatch().clone())?;
    // set_global_default succeeds only once per process, so this slot is free
    let _ = INSTALLED.set(Arc::clone(logger.sink()));
    Ok(())
}

/// Flush the installed logger's buffered records.
///
/// A no-op when nothing was installed. Never fails and never panics; flush
/// errors are dropped. The logger stays installed.
pub fn cleanup() {
    if let Some(sink) = INSTALLED.get() {
        let _ = sink.flush();
    }
}

/// Runs [`cleanup`] on drop, on every exit path of the owning scope.
#[must_use = "dropping the guard immediately flushes and leaves nothing to run at exit"]
pub struct CleanupGuard {
    _private: (),
}

impl CleanupGuard {
    /// Guard for a logger installed by other means, e.g. [`init_with_config`].
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Default for CleanupGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        cleanup();
    }
}
