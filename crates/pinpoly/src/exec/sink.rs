//! Serialized line output shared by all worker threads.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Destination for per-point outcome lines.
///
/// Implementations must write each line whole; ordering across callers is unspecified.
pub trait ResultSink: Sync {
    fn write_line(&self, line: &str) -> io::Result<()>;
}

/// Wraps a writer in a mutex. One lock acquisition per line.
///
/// A lock poisoned by a panicking writer is taken over, not propagated.
#[derive(Debug)]
pub struct LineSink<W> {
    inner: Mutex<W>,
}

impl<W: Write + Send> LineSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }

    pub fn flush(&self) -> io::Result<()> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> ResultSink for LineSink<W> {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut w = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(w, "{line}")
    }
}

/// Collects lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResultSink for MemorySink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_owned());
        Ok(())
    }
}
