// src/store/sheet.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One append-only table: a header row naming the columns, followed by
/// data rows of plain string cells.
///
/// The header is the schema. It only ever grows: columns are appended on
/// the right and never reordered or removed, so rows written before a
/// migration stay valid and read back with empty strings in the new
/// columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sheet {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A data row decoded against the header, keyed by column name.
#[derive(Debug, Clone)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    /// Returns the cell for `column`, or the empty string if the column is
    /// unknown or the stored row was shorter than the header.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }
}

impl Sheet {
    /// Brings the header up to date with `required` columns.
    ///
    /// * Empty sheet: writes the full header, in order.
    /// * Existing header: appends each missing column on the right.
    ///   Existing columns keep their positions, so previously written rows
    ///   are untouched by the migration.
    pub fn ensure_columns(&mut self, required: &[&str]) {
        if self.header.is_empty() {
            self.header = required.iter().map(|c| c.to_string()).collect();
            return;
        }

        for column in required {
            if !self.header.iter().any(|existing| existing == column) {
                self.header.push(column.to_string());
            }
        }
    }

    /// Decodes every data row into a name-keyed record.
    ///
    /// Ragged rows (shorter than the header) fill the missing trailing
    /// cells with empty strings instead of failing; cells beyond the
    /// header are ignored.
    pub fn records(&self) -> Vec<Record> {
        self.rows
            .iter()
            .map(|row| {
                let mut fields = HashMap::with_capacity(self.header.len());
                for (i, column) in self.header.iter().enumerate() {
                    let cell = row.get(i).cloned().unwrap_or_default();
                    fields.insert(column.clone(), cell);
                }
                Record { fields }
            })
            .collect()
    }

    /// Appends one row built from `fields`, keyed by column NAME.
    ///
    /// Keying by name rather than position keeps appends correct after a
    /// header migration. Columns without a matching field are written as
    /// empty strings; fields naming no header column are dropped. No
    /// duplicate checking happens here, that is the caller's job.
    pub fn append(&mut self, fields: &[(&str, String)]) {
        let row = self
            .header
            .iter()
            .map(|column| {
                fields
                    .iter()
                    .find(|(name, _)| name == column)
                    .map(|(_, value)| value.clone())
                    .unwrap_or_default()
            })
            .collect();
        self.rows.push(row);
    }

    /// Writes a single cell in place, addressed by row index and column
    /// name. Rows shorter than the target column are padded first.
    ///
    /// Returns false when the column or row does not exist.
    pub fn set_cell(&mut self, row_index: usize, column: &str, value: String) -> bool {
        let Some(col) = self.header.iter().position(|existing| existing == column) else {
            return false;
        };
        let Some(row) = self.rows.get_mut(row_index) else {
            return false;
        };

        if row.len() <= col {
            row.resize(col + 1, String::new());
        }
        row[col] = value;
        true
    }
}
