// src/handlers/announcement.rs

use chrono::Utc;
use serde_json::{Value, json};

use crate::{
    error::AppError,
    models::announcement::{ANN_ACTIVE, ANN_CONTENT, ANN_DATE, ANN_TITLE, Announcement,
        SaveAnnouncementRequest},
    store::Workbook,
};

/// Reads the announcement singleton out of the settings map. Keys that
/// were never written read as empty, with the banner inactive.
pub fn get_announcement(store: &Workbook) -> Result<Value, AppError> {
    let announcement = Announcement {
        title: store.setting(ANN_TITLE).unwrap_or_default().to_string(),
        content: store.setting(ANN_CONTENT).unwrap_or_default().to_string(),
        is_active: store.setting(ANN_ACTIVE) == Some("true"),
        updated_at: store.setting(ANN_DATE).unwrap_or_default().to_string(),
    };

    Ok(serde_json::to_value(announcement)?)
}

/// Overwrites the announcement, stamping `ANN_DATE` with the current
/// wall clock.
pub fn save_announcement(store: &mut Workbook, payload: Option<Value>) -> Result<Value, AppError> {
    let payload = super::require_body(payload)?;
    let req: SaveAnnouncementRequest = serde_json::from_value(payload)?;

    store.set_setting(ANN_TITLE, req.title);
    store.set_setting(ANN_CONTENT, req.content);
    store.set_setting(ANN_ACTIVE, req.is_active.to_string());
    store.set_setting(ANN_DATE, Utc::now().timestamp_millis().to_string());
    store.save()?;

    Ok(json!({ "status": "success" }))
}
