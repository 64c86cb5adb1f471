//! Append-only audit log of settled write calls.
//!
//! Records every settlement to a JSONL file. [`AuditObserver`] plugs the
//! logger into a result cell.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::warn;

use crate::result::CallResult;
use crate::state::Observer;

/// Errors from the audit logger.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// An audit log event.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,
    /// Write operation (e.g. "approve", "transfer").
    pub operation: String,
    /// Outcome tag, "transaction" or "error".
    pub outcome: String,
    /// Structured details about the event.
    pub details: serde_json::Value,
}

impl AuditEvent {
    /// Create a new audit event with the current timestamp.
    pub fn new(
        operation: impl Into<String>,
        outcome: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: operation.into(),
            outcome: outcome.into(),
            details,
        }
    }

    /// Builds the event for a settled call.
    pub fn settled<T: fmt::Display>(operation: &str, result: &CallResult<T>) -> Self {
        let details = match result {
            CallResult::Transaction(tx) => json!({ "transaction": tx.to_string() }),
            CallResult::Error(e) => json!({ "error": e.message() }),
        };
        Self::new(operation, result.outcome(), details)
    }
}

/// Append-only JSONL audit logger.
pub struct AuditLogger {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl AuditLogger {
    /// Create or open an audit log file for appending.
    pub fn new(path: &Path) -> Result<Self, AuditError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    /// Append an event to the audit log. Flushes after each write.
    pub fn log_event(&mut self, event: AuditEvent) -> Result<(), AuditError> {
        let line = serde_json::to_string(&event)?;
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Appends the settlement of one write operation.
    pub fn record<T: fmt::Display>(
        &mut self,
        operation: &str,
        result: &CallResult<T>,
    ) -> Result<(), AuditError> {
        self.log_event(AuditEvent::settled(operation, result))
    }

    /// Get the path of the audit log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Observer that appends each settlement of one operation to a shared
/// [`AuditLogger`]. Write failures are logged and otherwise ignored.
#[derive(Clone)]
pub struct AuditObserver {
    operation: &'static str,
    logger: Arc<Mutex<AuditLogger>>,
}

impl AuditObserver {
    pub fn new(operation: &'static str, logger: Arc<Mutex<AuditLogger>>) -> Self {
        Self { operation, logger }
    }
}

impl<T: fmt::Display> Observer<T> for AuditObserver {
    fn on_settled(&self, result: &CallResult<T>) {
        let mut logger = self.logger.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = logger.record(self.operation, result) {
            warn!(operation = self.operation, error = %e, "failed to write audit event");
        }
    }
}
