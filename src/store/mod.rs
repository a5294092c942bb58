// src/store/mod.rs

pub mod sheet;
pub mod workbook;

pub use sheet::{Record, Sheet};
pub use workbook::Workbook;

use std::fmt;

/// Errors raised by the workbook file boundary.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Corrupt(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(err) => write!(f, "workbook file error: {}", err),
            StoreError::Corrupt(err) => write!(f, "workbook file is not valid JSON: {}", err),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Corrupt(err)
    }
}
