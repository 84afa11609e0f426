use std::fmt::{self, Write};

use super::json::AttributesObject;
use super::Record;

/// `time<TAB>level<TAB>caller<TAB>msg[<TAB>{attributes}]`, stack trace below.
pub(crate) fn write(writer: &mut impl Write, record: &Record) -> fmt::Result {
    write!(writer, "{}\t{}", record.time, record.level)?;
    if let Some(caller) = &record.caller {
        write!(writer, "\t{caller}")?;
    }
    write!(writer, "\t{}", record.message)?;
    if !record.attributes.is_empty() {
        let attrs =
            serde_json::to_string(&AttributesObject(&record.attributes)).map_err(|_| fmt::Error)?;
        write!(writer, "\t{attrs}")?;
    }
    writeln!(writer)?;
    if let Some(trace) = &record.stacktrace {
        writeln!(writer, "{}", trace.trim_end())?;
    }
    Ok(())
}
