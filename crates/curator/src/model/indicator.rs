//! Indicator descriptors from the static registry.

use serde::{Deserialize, Serialize};

use super::request::FetchParams;
use super::source::SourceName;

/// Provider-specific key used to retrieve an indicator.
///
/// Deserialized untagged, so the registry writes whichever shape the
/// provider needs:
///
/// ```yaml
/// lookup: { chart: gdp-per-capita-worldbank }
/// lookup: { dataset: "OECD.SDD.NAD,DSD_NAMAIN1@DF_QNA,1.0", key: "Q.Y.{countries}.S1..B1GQ._Z...USD_PPP.LR.LA.T0102" }
/// lookup: { database: WEO, code: NGDP_RPCH }
/// lookup: { indicator: SI.POV.GINI }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupKey {
    /// OWID grapher chart slug.
    Chart { chart: String },
    /// SDMX dataflow plus dimension key.
    Dataset { dataset: String, key: String },
    /// Database plus series code.
    Database { database: String, code: String },
    /// Plain indicator code.
    Indicator { indicator: String },
}

impl LookupKey {
    /// The series-level code (slug, key or indicator code).
    pub fn code(&self) -> &str {
        match self {
            LookupKey::Chart { chart } => chart,
            LookupKey::Dataset { key, .. } => key,
            LookupKey::Database { code, .. } => code,
            LookupKey::Indicator { indicator } => indicator,
        }
    }

    /// The dataset or database qualifier, when the key has one.
    pub fn dataset(&self) -> Option<&str> {
        match self {
            LookupKey::Dataset { dataset, .. } => Some(dataset),
            LookupKey::Database { database, .. } => Some(database),
            LookupKey::Chart { .. } | LookupKey::Indicator { .. } => None,
        }
    }
}

/// A retrievable series as declared in the indicator registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorDescriptor {
    /// Unique id within the registry.
    pub id: String,
    /// Provider serving the series.
    pub source: SourceName,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Search tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// How to ask the provider for it.
    pub lookup: LookupKey,
    /// Canonical page for the series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl IndicatorDescriptor {
    /// Fetch parameters for this indicator with no country or year filter.
    pub fn fetch_params(&self) -> FetchParams {
        let mut params = FetchParams::new(self.lookup.code());
        if let Some(dataset) = self.lookup.dataset() {
            params = params.with_dataset(dataset);
        }
        params
    }

    /// Case-insensitive substring match against name, description and tags.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_text(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }

    /// Exact (case-insensitive) tag membership.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
