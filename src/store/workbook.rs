// src/store/workbook.rs

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::sheet::Sheet;
use super::StoreError;

/// The whole record store: named sheets plus a flat key-value settings
/// map (used for the announcement singleton), persisted as one JSON
/// document on disk.
///
/// The workbook itself does no locking; callers serialize access to it
/// through the request-wide mutex in `AppState`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Workbook {
    #[serde(default)]
    sheets: BTreeMap<String, Sheet>,
    #[serde(default)]
    settings: BTreeMap<String, String>,

    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Workbook {
    /// Opens the workbook at `path`, starting empty if the file does not
    /// exist yet. An unreadable or unparseable file is an error, never an
    /// empty workbook.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let path = PathBuf::from(path);

        let mut workbook = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str::<Workbook>(&contents)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Workbook::default(),
            Err(err) => return Err(StoreError::Io(err)),
        };

        workbook.path = Some(path);
        Ok(workbook)
    }

    /// A workbook with no file behind it; `save` becomes a no-op.
    pub fn in_memory() -> Self {
        Workbook::default()
    }

    /// Persists the full workbook to its backing file.
    pub fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the named sheet with its header migrated to cover
    /// `required_columns`, creating the sheet first if needed.
    pub fn ensure_sheet(&mut self, name: &str, required_columns: &[&str]) -> &mut Sheet {
        let sheet = self.sheets.entry(name.to_string()).or_default();
        sheet.ensure_columns(required_columns);
        sheet
    }

    /// Read-only access; `None` if the sheet was never created.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name)
    }

    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    pub fn set_setting(&mut self, key: &str, value: String) {
        self.settings.insert(key.to_string(), value);
    }
}
