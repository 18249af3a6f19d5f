//! Access log sinks.
//!
//! One [`AccessLogEntry`] is produced per request by the observer middleware
//! and handed to the configured [`AccessLogSink`]. Sinks serialize their own
//! writes; ordering between entries of different requests is not meaningful.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize)]
pub struct AccessLogEntry {
    pub started_at: DateTime<Utc>,
    pub method: String,
    pub path: String,
    pub status: u16,
    #[serde(rename = "duration_ms", serialize_with = "duration_as_millis")]
    pub duration: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

fn duration_as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_micros() as f64 / 1000.0)
}

#[derive(Debug, Error)]
pub enum AccessLogError {
    #[error("access log io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("access log encode error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("access log sink poisoned")]
    Poisoned,
}

pub trait AccessLogSink: Send + Sync {
    fn record(&self, entry: &AccessLogEntry) -> Result<(), AccessLogError>;

    /// `true` if `record` does blocking I/O and must not run on an async worker.
    fn is_blocking(&self) -> bool {
        false
    }
}

/// Emits entries as `tracing` events on the `access_log` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAccessLog;

impl AccessLogSink for TracingAccessLog {
    fn record(&self, entry: &AccessLogEntry) -> Result<(), AccessLogError> {
        tracing::info!(
            target: "access_log",
            method = %entry.method,
            path = %entry.path,
            status = entry.status,
            duration = ?entry.duration,
            request_id = entry.request_id.as_deref().unwrap_or("-"),
            "Completed {} {} with status {} in {:?}",
            entry.method,
            entry.path,
            entry.status,
            entry.duration,
        );
        Ok(())
    }
}

/// Appends one JSON line per entry to a file.
#[derive(Debug)]
pub struct FileAccessLog {
    file: Mutex<File>,
}

impl FileAccessLog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AccessLogError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AccessLogSink for FileAccessLog {
    fn record(&self, entry: &AccessLogEntry) -> Result<(), AccessLogError> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let mut file = self.file.lock().map_err(|_| AccessLogError::Poisoned)?;
        file.write_all(&line)?;
        Ok(())
    }

    fn is_blocking(&self) -> bool {
        true
    }
}

/// Keeps entries in memory. Handy for tests and local debugging.
#[derive(Debug, Default)]
pub struct MemoryAccessLog {
    entries: Mutex<Vec<AccessLogEntry>>,
}

impl MemoryAccessLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AccessLogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl AccessLogSink for MemoryAccessLog {
    fn record(&self, entry: &AccessLogEntry) -> Result<(), AccessLogError> {
        self.entries
            .lock()
            .map_err(|_| AccessLogError::Poisoned)?
            .push(entry.clone());
        Ok(())
    }
}
