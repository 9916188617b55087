//! General settings document (`config/settings.yaml`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::clean::CleaningRules;
use crate::countries::CountryLookup;
use crate::error::{CuratorError, Result};
use crate::model::SourceName;
use crate::sources::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};

/// Environment variable that overrides the settings path.
pub const CONFIG_ENV: &str = "CURATOR_CONFIG";

/// Default settings path, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/settings.yaml";

/// Directory layout for produced files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Raw provider output, one subdirectory per source.
    pub raw_data: PathBuf,
    /// Canonical datasets, one subdirectory per topic.
    pub clean_data: PathBuf,
    /// Metadata markdown, one file per topic.
    pub metadata: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            raw_data: PathBuf::from("data/raw"),
            clean_data: PathBuf::from("data/clean"),
            metadata: PathBuf::from("metadata"),
        }
    }
}

/// Outbound HTTP options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Hybrid search options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Seconds a cached result set stays valid. Zero disables caching.
    pub cache_ttl_secs: u64,
    /// Default cap on catalog results.
    pub max_local: usize,
    /// Default cap on results per remote provider.
    pub max_remote: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 300,
            max_local: 20,
            max_remote: 10,
        }
    }
}

impl SearchSettings {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Settings loaded from YAML. Every section is optional.
///
/// Sections this crate does not use (such as `llm:`) are accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub paths: PathSettings,
    /// Allowed topic labels. Empty allows any.
    pub topics: Vec<String>,
    /// Enabled sources. Empty enables all.
    pub sources: Vec<SourceName>,
    pub cleaning: CleaningRules,
    /// Extra `name: ISO3` country spellings.
    pub country_aliases: IndexMap<String, String>,
    /// Countries used when a request names none.
    pub default_countries: Vec<String>,
    pub http: HttpSettings,
    pub search: SearchSettings,
}

impl Settings {
    /// Load settings from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| CuratorError::io(path, e))?;
        let settings = Self::from_yaml_str(&text)
            .map_err(|e| CuratorError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Parse settings from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Built-in country table extended with the configured aliases.
    pub fn country_lookup(&self) -> CountryLookup {
        CountryLookup::builtin().with_aliases(&self.country_aliases)
    }

    /// Reject topics outside the configured list.
    pub fn validate_topic(&self, topic: &str) -> Result<()> {
        if self.topics.is_empty() || self.topics.iter().any(|t| t.eq_ignore_ascii_case(topic)) {
            Ok(())
        } else {
            Err(CuratorError::Config(format!(
                "Topic '{}' is not configured (known: {})",
                topic,
                self.topics.join(", ")
            )))
        }
    }

    /// Reject sources outside the configured list.
    pub fn validate_source(&self, source: SourceName) -> Result<()> {
        if self.sources.is_empty() || self.sources.contains(&source) {
            Ok(())
        } else {
            let enabled: Vec<&str> = self.sources.iter().map(|s| s.as_str()).collect();
            Err(CuratorError::Config(format!(
                "Source '{}' is not enabled (enabled: {})",
                source,
                enabled.join(", ")
            )))
        }
    }
}
