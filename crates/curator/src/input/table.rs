//! String-celled tabular data shared by adapters and the cleaner.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{CuratorError, Result};

/// Working column name for the provider's entity / country-name column.
pub const ENTITY_COLUMN: &str = "entity";
/// Working column name for a provider-supplied country code.
pub const CODE_COLUMN: &str = "code";
/// Working column name for the provider's time / year column.
pub const TIME_COLUMN: &str = "time";
/// Working column name for a provider's single observation column.
pub const VALUE_COLUMN: &str = "value";

/// Cell `index` of a row, empty when the row is shorter.
pub fn cell_at(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

/// Represents tabular data with provider-native or canonical columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order). Every row has `headers.len()` cells.
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Create a new data table, padding or truncating rows to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut table = Self {
            headers,
            rows: Vec::with_capacity(rows.len()),
        };
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Create an empty table with the given headers.
    pub fn with_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Find a column index by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Find the first column whose name matches any candidate, ignoring case.
    pub fn find_column(&self, candidates: &[&str]) -> Option<usize> {
        candidates.iter().find_map(|c| {
            self.headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(c))
        })
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Rename the first column matching any candidate (case-insensitive) to `to`.
    ///
    /// Returns false when no candidate exists or `to` is already present.
    pub fn rename_column(&mut self, candidates: &[&str], to: &str) -> bool {
        if self.column_index(to).is_some() {
            return false;
        }
        match self.find_column(candidates) {
            Some(idx) => {
                self.headers[idx] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Keep only rows for which `keep` returns true.
    pub fn retain_rows(&mut self, mut keep: impl FnMut(&[String]) -> bool) {
        self.rows.retain(|row| keep(row));
    }

    /// Check if a value represents a missing/null value.
    ///
    /// Covers the placeholders statistical APIs emit (`..`, `NaN`, `inf`) as
    /// well as the usual spreadsheet ones.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("nil")
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed.eq_ignore_ascii_case("inf")
            || trimmed.eq_ignore_ascii_case("-inf")
            || trimmed.eq_ignore_ascii_case("+inf")
            || trimmed.eq_ignore_ascii_case("infinity")
            || trimmed.eq_ignore_ascii_case("-infinity")
            || trimmed == "."
            || trimmed == ".."
            || trimmed == "..."
            || trimmed == "-"
    }

    /// Write the table as comma-separated CSV, creating parent directories.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| CuratorError::io(parent, e))?;
            }
        }

        let file = File::create(path).map_err(|e| CuratorError::io(path, e))?;
        let mut writer = csv::Writer::from_writer(BufWriter::new(file));
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| CuratorError::io(path, e.into_error()))?
            .flush()
            .map_err(|e| CuratorError::io(path, e))?;

        Ok(())
    }
}
