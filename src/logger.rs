use std::io::{self, Write};
use std::sync::Arc;
use tracing::Dispatch;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::JsonFields;
use tracing_subscriber::layer::SubscriberExt;

use crate::config::{Encoding, LoggingConfig};
use crate::encoder::RecordEncoder;
use crate::error::{ConfigError, Result};
use crate::sampling::SamplingLayer;
use crate::severity::Severity;
use crate::sink::{LogSink, SinkWriter};

/// A fully assembled logging pipeline.
///
/// Building a `Logger` has no global effect. Use it for a scope with
/// [`in_scope`](Logger::in_scope) or make it the process default with
/// [`install`](Logger::install).
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
    sink: Arc<LogSink>,
    level: Severity,
    encoding: Encoding,
}

impl Logger {
    /// Build a logger writing to the configured output.
    pub fn build(config: &LoggingConfig) -> Result<Self> {
        config.validate()?;
        let sink = LogSink::open(&config.output, config.buffered)?;
        Self::assemble(config, sink)
    }

    /// Build a logger writing to `writer` instead of the configured output.
    pub fn with_writer<W>(config: &LoggingConfig, writer: W) -> Result<Self>
    where
        W: Write + Send + 'static,
    {
        config.validate()?;
        Self::assemble(config, LogSink::new(writer, config.buffered))
    }

    fn assemble(config: &LoggingConfig, sink: LogSink) -> Result<Self> {
        // The level leads the directive list so targets the extra directives
        // do not name still fall back to it
        let directives = match config.targets.as_deref().map(str::trim) {
            Some(extra) if !extra.is_empty() => format!("{},{}", config.level, extra),
            _ => config.level.to_string(),
        };
        let targets = EnvFilter::builder()
            .parse(&directives)
            .map_err(|e| ConfigError::Invalid(format!("bad target directives: {e}")))?;

        let sink = Arc::new(sink);
        let fmt_layer = tracing_subscriber::fmt::layer()
            .fmt_fields(JsonFields::new())
            .event_format(RecordEncoder::new(config))
            .with_writer(SinkWriter::new(Arc::clone(&sink)));

        // The level filter is the only global threshold; target directives can
        // only narrow it further
        let subscriber = tracing_subscriber::registry()
            .with(config.level.level_filter())
            .with(targets)
            .with(SamplingLayer::new(config.sampling))
            .with(fmt_layer);

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            sink,
            level: config.level,
            encoding: config.encoding,
        })
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Run `f` with this logger as the current thread's default.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Make this logger the process-wide default and the target of
    /// [`cleanup`](crate::cleanup).
    pub fn install(&self) -> Result<()> {
        crate::logging::install(self)
    }

    /// Write out anything the sink still buffers.
    pub fn flush(&self) -> io::Result<()> {
        self.sink.flush()
    }

    pub(crate) fn sink(&self) -> &Arc<LogSink> {
        &self.sink
    }
}
