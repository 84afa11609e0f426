use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

use crate::config::Output;
use crate::error::{Error, Result};
use crate::redaction;

type BoxedWrite = Box<dyn Write + Send>;

/// Destination shared by every record of one logger.
///
/// Each record reaches the sink as one complete line and is written under a
/// single lock, so lines from concurrent threads never interleave. Registered
/// secrets are scrubbed from the line before it is written.
pub struct LogSink {
    writer: Mutex<BufWriter<BoxedWrite>>,
    buffered: bool,
}

impl LogSink {
    pub fn new<W>(writer: W, buffered: bool) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            writer: Mutex::new(BufWriter::new(Box::new(writer))),
            buffered,
        }
    }

    /// Open the configured output.
    pub fn open(output: &Output, buffered: bool) -> Result<Self> {
        let sink = match output {
            Output::Stdout => Self::new(io::stdout(), buffered),
            Output::Stderr => Self::new(io::stderr(), buffered),
            Output::File(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|source| Error::Output {
                        path: path.clone(),
                        source,
                    })?;
                Self::new(file, buffered)
            }
        };
        Ok(sink)
    }

    /// Write out anything still held in the buffer.
    pub fn flush(&self) -> io::Result<()> {
        self.lock().flush()
    }

    fn lock(&self) -> MutexGuard<'_, BufWriter<BoxedWrite>> {
        // A panic mid-write leaves at worst a partial line behind
        self.writer.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// `MakeWriter` handing out locked access to a shared [`LogSink`].
#[derive(Clone)]
pub struct SinkWriter {
    sink: Arc<LogSink>,
}

impl SinkWriter {
    pub fn new(sink: Arc<LogSink>) -> Self {
        Self { sink }
    }
}

impl<'a> MakeWriter<'a> for SinkWriter {
    type Writer = SinkGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SinkGuard {
            inner: self.sink.lock(),
            buffered: self.sink.buffered,
        }
    }
}

/// Locked handle to the sink for the duration of one record.
pub struct SinkGuard<'a> {
    inner: MutexGuard<'a, BufWriter<BoxedWrite>>,
    buffered: bool,
}

impl Write for SinkGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let scrubbed = redaction::scrub(&text);
        self.inner.write_all(scrubbed.as_bytes())?;
        if !self.buffered {
            self.inner.flush()?;
        }
        // The caller handed us `buf`; report all of it consumed even when
        // scrubbing changed the length
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// In-memory writer, handy for capturing the output of a scoped logger.
#[derive(Clone, Default)]
pub struct MemoryWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Written lines, without their terminators.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.lock().unwrap_or_else(|e| e.into_inner()).is_empty()
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
