//! Indicator registry (`config/indicators.yaml`).

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{CuratorError, Result};
use crate::model::{IndicatorDescriptor, SourceName};

/// Environment variable that overrides the registry path.
pub const INDICATORS_ENV: &str = "CURATOR_INDICATORS";

/// Default registry path, relative to the working directory.
pub const DEFAULT_INDICATORS_PATH: &str = "config/indicators.yaml";

#[derive(Debug, Deserialize)]
struct RegistryYaml {
    #[serde(default)]
    indicators: Vec<IndicatorDescriptor>,
}

/// Read-only catalog of known indicators, in file order.
#[derive(Debug, Clone, Default)]
pub struct IndicatorRegistry {
    indicators: IndexMap<String, IndicatorDescriptor>,
}

impl IndicatorRegistry {
    /// Load the registry from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| CuratorError::io(path, e))?;
        let registry = Self::from_yaml_str(&text)
            .map_err(|e| CuratorError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), indicators = registry.len(), "loaded indicator registry");
        Ok(registry)
    }

    /// Parse a registry document with a top-level `indicators:` list.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let doc: RegistryYaml = serde_yaml::from_str(text)?;
        Self::from_descriptors(doc.indicators)
    }

    /// Build a registry, rejecting duplicate ids.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = IndicatorDescriptor>) -> Result<Self> {
        let mut indicators = IndexMap::new();
        for descriptor in descriptors {
            if indicators.contains_key(&descriptor.id) {
                return Err(CuratorError::Config(format!(
                    "Duplicate indicator id '{}'",
                    descriptor.id
                )));
            }
            indicators.insert(descriptor.id.clone(), descriptor);
        }
        Ok(Self { indicators })
    }

    /// Descriptor by id.
    pub fn get(&self, id: &str) -> Option<&IndicatorDescriptor> {
        self.indicators.get(id)
    }

    /// All descriptors in file order.
    pub fn iter(&self) -> impl Iterator<Item = &IndicatorDescriptor> {
        self.indicators.values()
    }

    pub fn by_source(&self, source: SourceName) -> Vec<&IndicatorDescriptor> {
        self.iter().filter(|d| d.source == source).collect()
    }

    pub fn by_tag(&self, tag: &str) -> Vec<&IndicatorDescriptor> {
        self.iter().filter(|d| d.has_tag(tag)).collect()
    }

    /// Every tag in use, lowercased and sorted.
    pub fn tags(&self) -> Vec<String> {
        let tags: BTreeSet<String> = self
            .iter()
            .flat_map(|d| d.tags.iter().map(|t| t.to_lowercase()))
            .collect();
        tags.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}
