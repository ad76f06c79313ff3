//! Output sinks.
//!
//! A console writes every formatted line to one of two sinks, `stdout` and
//! `stderr`. A sink is anything implementing [`Sink`]; [`WriteSink`] adapts any
//! [`std::io::Write`], [`HostSink`] forwards to a host's own console and
//! [`BufferSink`] keeps the most recent lines in memory.

use std::io::{self, Write};
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::buffer::LineBuffer;
use crate::error::ConsoleError;

/// ANSI sequence that clears the screen and homes the cursor.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Text encoding applied when a chunk is turned into bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    #[default]
    #[serde(rename = "utf8", alias = "utf-8")]
    Utf8,
    #[serde(rename = "utf16le", alias = "ucs2")]
    Utf16Le,
    #[serde(rename = "latin1", alias = "binary")]
    Latin1,
}

impl Encoding {
    /// Encodes `chunk`. Latin-1 keeps the low byte of each UTF-16 code unit.
    pub fn encode(self, chunk: &str) -> Vec<u8> {
        match self {
            Encoding::Utf8 => chunk.as_bytes().to_vec(),
            Encoding::Utf16Le => chunk.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            Encoding::Latin1 => chunk.encode_utf16().map(|unit| unit as u8).collect(),
        }
    }
}

impl FromStr for Encoding {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "utf16le" | "utf-16le" | "ucs2" | "ucs-2" => Ok(Encoding::Utf16Le),
            "latin1" | "binary" => Ok(Encoding::Latin1),
            other => Err(ConsoleError::InvalidConfig(format!(
                "unsupported encoding `{other}`"
            ))),
        }
    }
}

/// A destination for formatted console output.
pub trait Sink {
    /// Accepts one formatted chunk. Returning `Ok` signals the chunk was
    /// accepted, not that it is durable.
    fn write(&mut self, chunk: &str, encoding: Encoding) -> io::Result<()>;

    /// Clears the destination. Sinks that cannot clear keep the default no-op.
    fn clear(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A sink shared between a console's `stdout` and `stderr` slots (or between
/// a console and its host).
pub type SharedSink = Arc<Mutex<dyn Sink + Send>>;

/// Wraps a sink for use by a console.
pub fn shared<S: Sink + Send + 'static>(sink: S) -> SharedSink {
    Arc::new(Mutex::new(sink))
}

/// Adapts any [`Write`] into a [`Sink`].
///
/// Each chunk is encoded, written in full and flushed. The writer is never
/// closed by the console; recover it with [`WriteSink::into_inner`].
#[derive(Debug)]
pub struct WriteSink<W> {
    writer: W,
    clear_sequence: Option<&'static str>,
}

impl<W: Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            clear_sequence: None,
        }
    }

    /// A sink for a terminal: `clear` writes the ANSI clear-screen sequence.
    pub fn terminal(writer: W) -> Self {
        Self {
            writer,
            clear_sequence: Some(CLEAR_SCREEN),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for WriteSink<W> {
    fn write(&mut self, chunk: &str, encoding: Encoding) -> io::Result<()> {
        self.writer.write_all(&encoding.encode(chunk))?;
        self.writer.flush()
    }

    fn clear(&mut self) -> io::Result<()> {
        match self.clear_sequence {
            Some(sequence) => {
                self.writer.write_all(sequence.as_bytes())?;
                self.writer.flush()
            }
            None => Ok(()),
        }
    }
}

/// The host's own console, targeted by the default sinks.
pub trait HostConsole: Send + Sync {
    fn log(&self, text: &str) -> io::Result<()>;

    fn error(&self, text: &str) -> io::Result<()>;

    fn clear(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Host console on the process's standard streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioHost;

impl HostConsole for StdioHost {
    fn log(&self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{text}")?;
        out.flush()
    }

    fn error(&self, text: &str) -> io::Result<()> {
        writeln!(io::stderr().lock(), "{text}")
    }

    fn clear(&self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(CLEAR_SCREEN.as_bytes())?;
        out.flush()
    }
}

/// Host console that turns output into `tracing` events on the `console`
/// target, for hosts whose only "terminal" is their log pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHost;

impl HostConsole for TracingHost {
    fn log(&self, text: &str) -> io::Result<()> {
        tracing::info!(target: "console", "{text}");
        Ok(())
    }

    fn error(&self, text: &str) -> io::Result<()> {
        tracing::error!(target: "console", "{text}");
        Ok(())
    }
}

/// Which host method a [`HostSink`] forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStream {
    Out,
    Err,
}

/// How a [`HostSink`] strips a formatted chunk before forwarding it.
///
/// Host consoles terminate lines themselves, so the chunk's own line break
/// has to go. `StripNewline` removes exactly that break and keeps group
/// indentation; `Trim` trims whitespace at both ends, indentation included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HostTrim {
    #[default]
    StripNewline,
    Trim,
}

impl HostTrim {
    pub fn apply(self, chunk: &str) -> &str {
        match self {
            HostTrim::StripNewline => chunk.strip_suffix('\n').unwrap_or(chunk),
            HostTrim::Trim => chunk.trim(),
        }
    }
}

/// Default sink: forwards each chunk to a [`HostConsole`].
///
/// Only the `Out` stream exposes the host's `clear`.
pub struct HostSink {
    host: Arc<dyn HostConsole>,
    stream: HostStream,
    trim: HostTrim,
}

impl HostSink {
    pub fn new(host: Arc<dyn HostConsole>, stream: HostStream, trim: HostTrim) -> Self {
        Self { host, stream, trim }
    }

    /// Out-stream sink on the process's standard streams.
    pub fn stdout() -> Self {
        Self::new(Arc::new(StdioHost), HostStream::Out, HostTrim::default())
    }

    /// Err-stream sink on the process's standard streams.
    pub fn stderr() -> Self {
        Self::new(Arc::new(StdioHost), HostStream::Err, HostTrim::default())
    }

    pub fn stream(&self) -> HostStream {
        self.stream
    }
}

impl Sink for HostSink {
    fn write(&mut self, chunk: &str, _encoding: Encoding) -> io::Result<()> {
        let text = self.trim.apply(chunk);
        match self.stream {
            HostStream::Out => self.host.log(text),
            HostStream::Err => self.host.error(text),
        }
    }

    fn clear(&mut self) -> io::Result<()> {
        match self.stream {
            HostStream::Out => self.host.clear(),
            HostStream::Err => Ok(()),
        }
    }
}

/// In-memory sink keeping the most recent lines.
///
/// Clones share the same buffer, so a host can keep one handle for display
/// while the console writes through another.
#[derive(Debug, Clone)]
pub struct BufferSink {
    lines: Arc<Mutex<LineBuffer>>,
}

impl BufferSink {
    /// Creates a sink retaining at most `capacity` lines.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(LineBuffer::new(capacity))),
        }
    }

    /// Buffered lines, oldest first, without line breaks.
    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().map(str::to_owned).collect()
    }

    /// Buffered lines joined back into terminated text.
    pub fn contents(&self) -> String {
        self.lock().iter().map(|line| format!("{line}\n")).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Lines dropped because the buffer was full.
    pub fn evicted(&self) -> u64 {
        self.lock().evicted()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LineBuffer> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Sink for BufferSink {
    fn write(&mut self, chunk: &str, _encoding: Encoding) -> io::Result<()> {
        self.lock().push_chunk(chunk);
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.lock().clear();
        Ok(())
    }
}
