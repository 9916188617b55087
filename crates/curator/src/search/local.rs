//! Catalog search over the indicator registry.

use crate::config::IndicatorRegistry;

use super::result::{SearchHit, SearchOptions};

/// Registry entries matching `query`, in registry order.
///
/// Text match is a case-insensitive substring test over name, description
/// and tags (any of them). `source` and `tag` options are exact filters.
pub fn search_catalog(registry: &IndicatorRegistry, query: &str, options: &SearchOptions) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    registry
        .iter()
        .filter(|d| options.source.is_none_or(|s| d.source == s))
        .filter(|d| options.tag.as_deref().is_none_or(|t| d.has_tag(t)))
        .filter(|d| d.matches_text(&needle))
        .take(options.max_local)
        .map(SearchHit::from_descriptor)
        .collect()
}
