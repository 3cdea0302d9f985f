use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::Local;

use crate::errors::GptError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only request/response log. No rotation.
#[derive(Debug)]
pub struct AuditLog {
    path: PathBuf,
    guard: Mutex<()>,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry, creating the file if needed.
    ///
    /// # Errors
    ///
    /// Returns `GptError::StorageError` if the file cannot be opened or
    /// written.
    pub fn record(&self, url: &str, request_body: &str, response_body: &str) -> Result<(), GptError> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let entry = format_entry(&timestamp, url, request_body, response_body);

        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                GptError::StorageError(format!("log '{}': {e}", self.path.display()))
            })?;
        // One write per entry so appends from other handles don't interleave mid-entry.
        file.write_all(entry.as_bytes())
            .map_err(|e| GptError::StorageError(format!("log '{}': {e}", self.path.display())))
    }
}

#[must_use]
pub fn format_entry(timestamp: &str, url: &str, request_body: &str, response_body: &str) -> String {
    format!("{timestamp} {url}\nREQUEST: {request_body}\nRESPONSE: {response_body}\n")
}
