//! Canonical datasets and their on-disk naming convention.

use std::path::{Path, PathBuf};

use crate::error::{CuratorError, Result};
use crate::input::DataTable;
use crate::model::SourceName;

use super::cleaner::CleanReport;

/// A cleaned table plus the report describing how it was produced.
#[derive(Debug, Clone)]
pub struct CanonicalDataset {
    /// `country`, `year`, then the remaining source columns.
    pub table: DataTable,
    /// Cleaning statistics.
    pub report: CleanReport,
}

impl CanonicalDataset {
    /// Inclusive `(first, last)` year in the table.
    pub fn year_range(&self) -> (i32, i32) {
        self.report.year_range
    }

    /// `{topic}_{source}_{coverage}_{start}_{end}.csv` with slugified labels.
    ///
    /// Depends only on the table's years and the labels, so re-cleaning the
    /// same content with the same labels yields the same name.
    pub fn file_name(&self, topic: &str, source: SourceName, coverage: &str) -> Result<String> {
        let topic = label_slug("topic", topic)?;
        let coverage = label_slug("coverage", coverage)?;
        let (start, end) = self.year_range();
        Ok(format!(
            "{}_{}_{}_{}_{}.csv",
            topic,
            source.as_str(),
            coverage,
            start,
            end
        ))
    }

    /// Full path under `clean_root`: `{clean_root}/{topic}/{file_name}`.
    pub fn path(
        &self,
        clean_root: impl AsRef<Path>,
        topic: &str,
        source: SourceName,
        coverage: &str,
    ) -> Result<PathBuf> {
        let file_name = self.file_name(topic, source, coverage)?;
        Ok(clean_root
            .as_ref()
            .join(label_slug("topic", topic)?)
            .join(file_name))
    }

    /// Write the table as CSV, overwriting an existing file of the same name.
    pub fn persist(
        &self,
        clean_root: impl AsRef<Path>,
        topic: &str,
        source: SourceName,
        coverage: &str,
    ) -> Result<PathBuf> {
        let path = self.path(clean_root, topic, source, coverage)?;
        self.table.write_csv(&path)?;
        tracing::info!(path = %path.display(), rows = self.table.row_count(), "wrote canonical dataset");
        Ok(path)
    }
}

/// Lowercase ASCII slug: alphanumerics kept, runs of anything else become `-`.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_dash = false;
    for c in label.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn label_slug(what: &str, label: &str) -> Result<String> {
    let slug = slugify(label);
    if slug.is_empty() {
        return Err(CuratorError::InvalidRequest(format!(
            "{} label '{}' has no usable characters",
            what, label
        )));
    }
    Ok(slug)
}
