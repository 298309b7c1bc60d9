//! Text sinks for console lines and the data log.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::DiagnosticsError;

/// An append-only text destination.
pub trait LogSink: Send {
    /// Append `text` verbatim and flush.
    fn append(&mut self, text: &str) -> io::Result<()>;
}

/// A file opened in append mode.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: File,
}

impl FileSink {
    /// Open (creating if needed) `path` for appending.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, DiagnosticsError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| DiagnosticsError::LogOpen {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, file })
    }

    /// The path the sink writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn append(&mut self, text: &str) -> io::Result<()> {
        self.file.write_all(text.as_bytes())?;
        self.file.flush()
    }
}

/// Standard output.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn append(&mut self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }
}

/// An in-memory buffer shared between clones.
///
/// Hand one clone to a reporter and keep another to inspect what was
/// written.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<String>>,
}

impl MemorySink {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything appended so far.
    pub fn contents(&self) -> String {
        match self.buf.lock() {
            Ok(s) => s.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl LogSink for MemorySink {
    fn append(&mut self, text: &str) -> io::Result<()> {
        let mut s = self
            .buf
            .lock()
            .map_err(|_| io::Error::other("memory sink lock poisoned"))?;
        s.push_str(text);
        Ok(())
    }
}
