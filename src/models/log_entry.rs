// src/models/log_entry.rs

use serde::{Deserialize, Serialize};

use crate::store::Record;

/// Sheet name and header for the audit trail.
pub const LOGS_SHEET: &str = "SystemLogs";
pub const LOG_COLUMNS: &[&str] = &["timestamp", "action", "user", "details"];

/// One audit trail entry. The sheet is append-only and unbounded; reads
/// are truncated to the most recent entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO-8601 timestamp, stamped server-side at append time.
    pub timestamp: String,
    pub action: String,
    pub user: String,
    pub details: String,
}

impl LogEntry {
    pub fn from_record(record: &Record) -> Self {
        LogEntry {
            timestamp: record.get("timestamp").to_string(),
            action: record.get("action").to_string(),
            user: record.get("user").to_string(),
            details: record.get("details").to_string(),
        }
    }

    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("timestamp", self.timestamp.clone()),
            ("action", self.action.clone()),
            ("user", self.user.clone()),
            ("details", self.details.clone()),
        ]
    }
}

/// DTO for appending an audit entry.
#[derive(Debug, Deserialize)]
pub struct LogActionRequest {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub details: String,
}
