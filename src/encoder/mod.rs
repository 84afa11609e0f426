//! Record encoders plugged into the `fmt` layer.
//!
//! Both encodings render the same record: level, ISO-8601 time, short caller
//! location, message, then span attributes (root first) and event attributes.

mod console;
mod fields;
mod json;

use chrono::Local;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

use crate::config::{Encoding, FieldKeys, LoggingConfig};
use crate::severity::Severity;

pub(crate) use fields::{Attributes, EventVisitor};

/// ISO-8601 with milliseconds and numeric UTC offset.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// One event, ready to be written.
pub(crate) struct Record {
    pub(crate) level: Severity,
    pub(crate) time: String,
    pub(crate) caller: Option<String>,
    pub(crate) message: String,
    pub(crate) attributes: Attributes,
    pub(crate) stacktrace: Option<String>,
}

/// `FormatEvent` implementation for both encodings.
#[derive(Debug, Clone)]
pub struct RecordEncoder {
    encoding: Encoding,
    keys: FieldKeys,
    with_caller: bool,
    stacktrace_level: Option<Severity>,
}

impl RecordEncoder {
    pub fn new(config: &LoggingConfig) -> Self {
        Self {
            encoding: config.encoding,
            keys: config.keys.clone(),
            with_caller: config.with_caller,
            stacktrace_level: config.stacktrace_level,
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    fn stacktrace(&self, level: Severity) -> Option<String> {
        if level < self.stacktrace_level? {
            return None;
        }
        // Only captured when RUST_BACKTRACE / RUST_LIB_BACKTRACE ask for it
        let trace = Backtrace::capture();
        match trace.status() {
            BacktraceStatus::Captured => Some(trace.to_string()),
            _ => None,
        }
    }
}

impl<S, N> FormatEvent<S, N> for RecordEncoder
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let level = Severity::from_level(meta.level());

        let mut visitor = EventVisitor::default();
        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                let extensions = span.extensions();
                if let Some(stored) = extensions.get::<FormattedFields<N>>() {
                    visitor.attributes.extend_from_json(&stored.fields);
                }
            }
        }
        event.record(&mut visitor);

        let record = Record {
            level,
            time: Local::now().format(TIME_FORMAT).to_string(),
            caller: self.with_caller.then(|| caller(meta)),
            message: visitor.message.unwrap_or_default(),
            attributes: visitor.attributes,
            stacktrace: self.stacktrace(level),
        };

        match self.encoding {
            Encoding::Json => json::write(&mut writer, &self.keys, &record),
            Encoding::Console => console::write(&mut writer, &record),
        }
    }
}

/// `dir/file.rs:line` for the event's callsite.
pub(crate) fn caller(meta: &Metadata<'_>) -> String {
    match (meta.file(), meta.line()) {
        (Some(file), Some(line)) => format!("{}:{}", short_path(file), line),
        (Some(file), None) => short_path(file).to_string(),
        _ => meta.module_path().unwrap_or_else(|| meta.target()).to_string(),
    }
}

/// Keep the last directory and the file name.
pub(crate) fn short_path(file: &str) -> &str {
    let mut separators = file.rmatch_indices(|c: char| c == '/' || c == '\\');
    match (separators.next(), separators.next()) {
        (Some(_), Some((idx, _))) => &file[idx + 1..],
        _ => file,
    }
}
