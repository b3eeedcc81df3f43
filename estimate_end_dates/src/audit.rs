//! Append-only audit trail of every fetch, update, skip and failure.
//!
//! Lines have the form `<timestamp> - <LEVEL> - <message>`. Each line is
//! also emitted as a `tracing` event so the console can follow along.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
        }
    }
}

pub struct AuditLog<W: Write> {
    sink: W,
}

impl AuditLog<File> {
    /// Opens `path` for appending, creating it if needed. Existing content
    /// is never truncated.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> AuditLog<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn info(&mut self, message: &str) -> io::Result<()> {
        tracing::info!("{}", message);
        self.record(Level::Info, message)
    }

    pub fn warn(&mut self, message: &str) -> io::Result<()> {
        tracing::warn!("{}", message);
        self.record(Level::Warning, message)
    }

    fn record(&mut self, level: Level, message: &str) -> io::Result<()> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        writeln!(self.sink, "{} - {} - {}", timestamp, level.as_str(), message)?;
        self.sink.flush()
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
