//! Markdown metadata for canonical datasets.
//!
//! Template output only: every field comes from the pipeline summary and the
//! registry descriptor.

use std::fs;
use std::path::{Path, PathBuf};

use crate::clean::{COUNTRY_COLUMN, YEAR_COLUMN, slugify};
use crate::curator::PipelineSummary;
use crate::error::{CuratorError, Result};
use crate::model::IndicatorDescriptor;

/// Countries listed by code before the list is abbreviated.
const MAX_LISTED_COUNTRIES: usize = 40;

/// Writes `{metadata_root}/{topic}.md`.
#[derive(Debug, Clone)]
pub struct MetadataGenerator {
    root: PathBuf,
}

impl MetadataGenerator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the metadata file for `topic`.
    pub fn path_for(&self, topic: &str) -> PathBuf {
        self.root.join(format!("{}.md", slugify(topic)))
    }

    /// Render the markdown description of a dataset.
    pub fn render(&self, summary: &PipelineSummary, descriptor: Option<&IndicatorDescriptor>) -> String {
        let mut out = String::new();

        let title = descriptor
            .map(|d| d.name.clone())
            .or_else(|| summary.indicator_code.clone())
            .unwrap_or_else(|| summary.topic.clone());
        out.push_str(&format!("# {}\n\n", title));

        if let Some(d) = descriptor.filter(|d| !d.description.is_empty()) {
            out.push_str(&format!("{}\n\n", d.description.trim()));
        }

        let file_name = summary
            .canonical_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        out.push_str("## Dataset\n\n");
        out.push_str(&format!("- **Topic:** {}\n", summary.topic));
        out.push_str(&format!(
            "- **Source:** {} (`{}`)\n",
            summary.source.label(),
            summary.source
        ));
        if let Some(code) = &summary.indicator_code {
            out.push_str(&format!("- **Indicator:** `{}`\n", code));
        }
        if let Some(url) = descriptor.and_then(|d| d.url.as_deref()) {
            out.push_str(&format!("- **Reference:** <{}>\n", url));
        }
        out.push_str(&format!("- **Coverage:** {}\n", summary.coverage));
        out.push_str(&format!(
            "- **Period:** {} to {}\n",
            summary.year_range.0, summary.year_range.1
        ));
        out.push_str(&format!("- **Rows:** {}\n", summary.rows));
        out.push_str(&format!("- **Columns:** {}\n", summary.columns));
        out.push_str(&format!("- **Countries:** {}\n", country_list(&summary.countries)));
        out.push_str(&format!("- **File:** `{}`\n\n", file_name));

        if let Some(d) = descriptor.filter(|d| !d.tags.is_empty()) {
            out.push_str(&format!("**Tags:** {}\n\n", d.tags.join(", ")));
        }

        out.push_str("## Columns\n\n| Column | Content |\n|---|---|\n");
        for column in &summary.column_names {
            let content = if column == COUNTRY_COLUMN {
                "ISO 3166-1 alpha-3 country code"
            } else if column == YEAR_COLUMN {
                "Observation year"
            } else if summary.measurement_columns.contains(column) {
                "Measurement (numeric, empty when missing)"
            } else {
                "Attribute (text)"
            };
            out.push_str(&format!("| `{}` | {} |\n", column, content));
        }
        out.push('\n');

        if !summary.unresolved_values.is_empty() {
            out.push_str("## Notes\n\n");
            out.push_str(&format!(
                "Country values kept as published (no ISO-3 match): {}\n\n",
                summary.unresolved_values.join(", ")
            ));
        }

        if let Some(p) = &summary.provenance {
            out.push_str("## Provenance\n\n");
            out.push_str(&format!("- **Fetched:** {}\n", p.fetched_at.to_rfc3339()));
            for url in &p.urls {
                out.push_str(&format!("- **Request:** <{}>\n", url));
            }
            out.push_str(&format!("- **Payload hash:** `{}`\n", p.hash));
        }

        out
    }

    /// Write rendered markdown for `topic`, replacing any previous file.
    pub fn write(&self, topic: &str, markdown: &str) -> Result<PathBuf> {
        let path = self.path_for(topic);
        fs::create_dir_all(&self.root).map_err(|e| CuratorError::io(&self.root, e))?;
        fs::write(&path, markdown).map_err(|e| CuratorError::io(&path, e))?;
        tracing::debug!(path = %path.display(), "wrote metadata");
        Ok(path)
    }
}

fn country_list(countries: &[String]) -> String {
    if countries.len() <= MAX_LISTED_COUNTRIES {
        format!("{} ({})", countries.len(), countries.join(", "))
    } else {
        format!(
            "{} ({}, ...)",
            countries.len(),
            countries[..MAX_LISTED_COUNTRIES].join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LookupKey, SourceName};
    use tempfile::TempDir;

    fn summary() -> PipelineSummary {
        PipelineSummary {
            source: SourceName::WorldBank,
            topic: "inequality".into(),
            coverage: "latam".into(),
            indicator_id: Some("wb_gini".into()),
            indicator_code: Some("SI.POV.GINI".into()),
            canonical_path: PathBuf::from("clean/inequality/inequality_worldbank_latam_2020_2022.csv"),
            raw_path: PathBuf::from("raw/worldbank/x.csv"),
            metadata_path: None,
            rows: 6,
            columns: 4,
            resolved_countries: 2,
            unresolved_values: vec![],
            year_range: (2020, 2022),
            column_names: vec!["country".into(), "year".into(), "indicator".into(), "value".into()],
            measurement_columns: vec!["value".into()],
            countries: vec!["ARG".into(), "BRA".into()],
            provenance: None,
        }
    }

    fn descriptor() -> IndicatorDescriptor {
        IndicatorDescriptor {
            id: "wb_gini".into(),
            source: SourceName::WorldBank,
            name: "Gini index".into(),
            description: "Income inequality.".into(),
            tags: vec!["inequality".into()],
            lookup: LookupKey::Indicator {
                indicator: "SI.POV.GINI".into(),
            },
            url: Some("https://data.worldbank.org/indicator/SI.POV.GINI".into()),
        }
    }

    #[test]
    fn test_render_sections() {
        let generator = MetadataGenerator::new("metadata");
        let md = generator.render(&summary(), Some(&descriptor()));
        assert!(md.starts_with("# Gini index\n"));
        assert!(md.contains("- **Source:** World Bank (`worldbank`)"));
        assert!(md.contains("- **Period:** 2020 to 2022"));
        assert!(md.contains("- **Countries:** 2 (ARG, BRA)"));
        assert!(md.contains("| `value` | Measurement"));
        assert!(md.contains("| `indicator` | Attribute"));
        assert!(!md.contains("## Provenance"));
    }

    #[test]
    fn test_render_without_descriptor_uses_code() {
        let md = MetadataGenerator::new("m").render(&summary(), None);
        assert!(md.starts_with("# SI.POV.GINI\n"));
    }

    #[test]
    fn test_write_one_file_per_topic() {
        let dir = TempDir::new().unwrap();
        let generator = MetadataGenerator::new(dir.path());
        let first = generator.write("Labour Market", "a").unwrap();
        let second = generator.write("Labour Market", "b").unwrap();
        assert_eq!(first, dir.path().join("labour-market.md"));
        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(first).unwrap(), "b");
    }
}
