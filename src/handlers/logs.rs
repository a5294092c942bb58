// src/handlers/logs.rs

use chrono::Utc;
use serde_json::{Value, json};

use crate::{
    error::AppError,
    models::log_entry::{LOG_COLUMNS, LOGS_SHEET, LogActionRequest, LogEntry},
    store::Workbook,
};

/// The audit sheet grows without bound; reads return only this many of
/// the most recent entries.
const LOG_READ_LIMIT: usize = 50;

/// Appends one audit trail entry, timestamped server-side.
pub fn log_action(store: &mut Workbook, payload: Option<Value>) -> Result<Value, AppError> {
    let payload = super::require_body(payload)?;
    let req: LogActionRequest = serde_json::from_value(payload)?;

    let entry = LogEntry {
        timestamp: Utc::now().to_rfc3339(),
        action: req.action,
        user: req.user,
        details: req.details,
    };

    let sheet = store.ensure_sheet(LOGS_SHEET, LOG_COLUMNS);
    sheet.append(&entry.to_fields());
    store.save()?;

    Ok(json!({ "status": "success" }))
}

/// Returns the last 50 audit entries, newest first.
pub fn get_system_logs(store: &Workbook) -> Result<Value, AppError> {
    let mut entries: Vec<LogEntry> = store
        .sheet(LOGS_SHEET)
        .map(|sheet| sheet.records())
        .unwrap_or_default()
        .iter()
        .map(LogEntry::from_record)
        .collect();

    entries.reverse();
    entries.truncate(LOG_READ_LIMIT);

    Ok(serde_json::to_value(entries)?)
}
