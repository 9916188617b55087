//! Search options, hits and merged result sets.

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{IndicatorDescriptor, SourceName};

/// Key under which catalog results are counted in [`SearchResultSet::sources`].
pub const LOCAL_KEY: &str = "local";

/// Knobs for one hybrid search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchOptions {
    /// Query live providers as well as the catalog.
    pub include_remote: bool,
    /// Cap on catalog hits.
    pub max_local: usize,
    /// Cap on hits per remote provider.
    pub max_remote: usize,
    /// Only this provider (catalog and remote).
    pub source: Option<SourceName>,
    /// Only catalog entries carrying this tag. Remote hits have no tags.
    pub tag: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            include_remote: true,
            max_local: 20,
            max_remote: 10,
            source: None,
            tag: None,
        }
    }
}

impl SearchOptions {
    pub fn local_only(mut self) -> Self {
        self.include_remote = false;
        self
    }

    pub fn with_source(mut self, source: SourceName) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// One search result, from the catalog or a live provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Registry id for catalog hits, provider code for remote ones.
    pub id: String,
    pub source: SourceName,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    /// Provider lookup code (slug, SDMX key or indicator code).
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// A canonical file for this hit's source exists (catalog hits only).
    pub downloaded: bool,
}

impl SearchHit {
    /// Project a registry descriptor.
    pub fn from_descriptor(descriptor: &IndicatorDescriptor) -> Self {
        Self {
            id: descriptor.id.clone(),
            source: descriptor.source,
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            tags: descriptor.tags.clone(),
            code: descriptor.lookup.code().to_string(),
            url: descriptor.url.clone(),
            downloaded: false,
        }
    }
}

/// Merged output of a hybrid search.
///
/// `local.len() + remote.len() == total == sources.values().sum()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResultSet {
    pub query: String,
    pub local: Vec<SearchHit>,
    pub remote: Vec<SearchHit>,
    pub total: usize,
    /// Hit count per origin: `"local"` plus one entry per queried provider.
    pub sources: IndexMap<String, usize>,
    /// `"ok"` or the failure message per queried provider.
    pub status: IndexMap<String, String>,
    /// Served from the cache.
    pub cached: bool,
}

impl SearchResultSet {
    /// Whether every queried provider answered.
    pub fn all_ok(&self) -> bool {
        self.status.values().all(|s| s == "ok")
    }
}
