// src/models/announcement.rs

use serde::{Deserialize, Serialize};

/// Settings keys backing the announcement singleton.
pub const ANN_TITLE: &str = "ANN_TITLE";
pub const ANN_CONTENT: &str = "ANN_CONTENT";
pub const ANN_ACTIVE: &str = "ANN_ACTIVE";
pub const ANN_DATE: &str = "ANN_DATE";

/// The single site-wide announcement banner, stored as four flat keys in
/// the workbook settings map rather than as a sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub title: String,
    pub content: String,
    pub is_active: bool,

    /// Epoch milliseconds of the last save, kept as a string.
    pub updated_at: String,
}

/// DTO for saving the announcement. `updatedAt` is always stamped
/// server-side.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAnnouncementRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_active: bool,
}
