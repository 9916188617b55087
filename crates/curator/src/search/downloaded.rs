//! "Downloaded" detection for catalog hits.
//!
//! Coarse by construction: a source counts as downloaded when any canonical
//! file under the clean root matches `**/*_{source}_*.csv`. File names carry
//! no indicator id, so two indicators from one source share the flag.

use std::collections::HashSet;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::error::{CuratorError, Result};
use crate::model::SourceName;

/// Glob matching canonical files produced from `source`.
pub fn source_pattern(source: SourceName) -> String {
    format!("**/*_{}_*.csv", source.as_str())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(
            Glob::new(pattern)
                .map_err(|e| CuratorError::Config(format!("Invalid glob '{}': {}", pattern, e)))?,
        );
    }
    builder
        .build()
        .map_err(|e| CuratorError::Config(format!("Invalid glob set: {}", e)))
}

/// Which sources have at least one canonical file on disk.
#[derive(Debug, Clone, Default)]
pub struct DownloadIndex {
    sources: HashSet<SourceName>,
}

impl DownloadIndex {
    /// Scan `clean_root` once. A missing directory yields an empty index.
    pub fn scan(clean_root: impl AsRef<Path>) -> Result<Self> {
        let root = clean_root.as_ref();
        let mut sources = HashSet::new();
        if !root.is_dir() {
            return Ok(Self { sources });
        }

        let patterns: Vec<String> = SourceName::ALL.iter().map(|s| source_pattern(*s)).collect();
        let set = build_globset(&patterns)?;

        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry under clean root");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(path);
            for idx in set.matches(relative) {
                sources.insert(SourceName::ALL[idx]);
            }
        }

        Ok(Self { sources })
    }

    pub fn is_downloaded(&self, source: SourceName) -> bool {
        self.sources.contains(&source)
    }
}
