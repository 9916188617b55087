//! Catalog plus live-provider search with a TTL cache.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use rayon::prelude::*;

use crate::config::IndicatorRegistry;
use crate::model::SourceName;

use super::cache::TtlCache;
use super::downloaded::DownloadIndex;
use super::local::search_catalog;
use super::remote::RemoteSearcher;
use super::result::{LOCAL_KEY, SearchHit, SearchOptions, SearchResultSet};

/// Everything that distinguishes one search from another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SearchKey {
    query: String,
    options: SearchOptions,
}

/// Searches the registry and live provider catalogs, merging the results.
///
/// The result cache is owned by this value and mutated through `&mut self`;
/// share a `HybridSearch` across threads only behind your own lock.
pub struct HybridSearch {
    registry: Arc<IndicatorRegistry>,
    searchers: Vec<Box<dyn RemoteSearcher>>,
    clean_root: PathBuf,
    cache: TtlCache<SearchKey, SearchResultSet>,
}

impl HybridSearch {
    pub fn new(
        registry: Arc<IndicatorRegistry>,
        searchers: Vec<Box<dyn RemoteSearcher>>,
        clean_root: impl Into<PathBuf>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            registry,
            searchers,
            clean_root: clean_root.into(),
            cache: TtlCache::new(cache_ttl),
        }
    }

    /// Providers with a live searcher.
    pub fn remote_sources(&self) -> Vec<SourceName> {
        self.searchers.iter().map(|s| s.source()).collect()
    }

    /// Drop every cached result.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Run a search, serving it from the cache while fresh.
    ///
    /// Remote providers are queried in parallel. A failing provider
    /// contributes no hits, a zero count and its error in `status`; it never
    /// fails the search, but the result is not cached so the next call retries.
    pub fn search(&mut self, query: &str, options: &SearchOptions) -> SearchResultSet {
        let key = SearchKey {
            query: query.trim().to_lowercase(),
            options: options.clone(),
        };

        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(query, "search served from cache");
            let mut result = hit.clone();
            result.query = query.to_string();
            result.cached = true;
            return result;
        }

        let result = self.compute(query, options);
        self.cache.purge_expired();
        if result.all_ok() {
            self.cache.insert(key, result.clone());
        }
        result
    }

    fn compute(&self, query: &str, options: &SearchOptions) -> SearchResultSet {
        let mut local = search_catalog(&self.registry, query, options);
        self.annotate_downloaded(&mut local);

        let mut sources = IndexMap::new();
        let mut status = IndexMap::new();
        sources.insert(LOCAL_KEY.to_string(), local.len());

        let mut remote = Vec::new();
        if options.include_remote {
            let outcomes: Vec<_> = self
                .searchers
                .par_iter()
                .filter(|s| options.source.is_none_or(|wanted| s.source() == wanted))
                .map(|s| (s.source(), s.search(query, options.max_remote)))
                .collect();

            for (source, outcome) in outcomes {
                match outcome {
                    Ok(hits) => {
                        *sources.entry(source.to_string()).or_default() += hits.len();
                        status.entry(source.to_string()).or_insert_with(|| "ok".to_string());
                        remote.extend(hits);
                    }
                    Err(e) => {
                        tracing::warn!(%source, error = %e, "remote search failed");
                        sources.entry(source.to_string()).or_insert(0);
                        // A failure outranks any sibling searcher's success.
                        status.insert(source.to_string(), e.to_string());
                    }
                }
            }
        }

        let total = local.len() + remote.len();
        tracing::info!(query, local = local.len(), remote = remote.len(), "search complete");

        SearchResultSet {
            query: query.to_string(),
            local,
            remote,
            total,
            sources,
            status,
            cached: false,
        }
    }

    fn annotate_downloaded(&self, hits: &mut [SearchHit]) {
        if hits.is_empty() {
            return;
        }
        match DownloadIndex::scan(&self.clean_root) {
            Ok(index) => {
                for hit in hits {
                    hit.downloaded = index.is_downloaded(hit.source);
                }
            }
            Err(e) => tracing::warn!(error = %e, "could not scan clean data directory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::{DataSourceError, Result};

    struct Fixed(SourceName, Vec<&'static str>);

    impl RemoteSearcher for Fixed {
        fn source(&self) -> SourceName {
            self.0
        }

        fn search(&self, _query: &str, limit: usize) -> Result<Vec<SearchHit>> {
            Ok(self
                .1
                .iter()
                .take(limit)
                .map(|code| SearchHit {
                    id: code.to_string(),
                    source: self.0,
                    name: code.to_string(),
                    description: String::new(),
                    tags: vec![],
                    code: code.to_string(),
                    url: None,
                    downloaded: false,
                })
                .collect())
        }
    }

    struct Broken;

    impl RemoteSearcher for Broken {
        fn source(&self) -> SourceName {
            SourceName::Imf
        }

        fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchHit>> {
            Err(DataSourceError::Network {
                provider: SourceName::Imf,
                cause: "connection refused".into(),
            }
            .into())
        }
    }

    /// Fails on its first call, then answers with one hit.
    struct Flaky(Arc<AtomicUsize>);

    impl RemoteSearcher for Flaky {
        fn source(&self) -> SourceName {
            SourceName::Oecd
        }

        fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
            if self.0.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(DataSourceError::Network {
                    provider: SourceName::Oecd,
                    cause: "timed out".into(),
                }
                .into());
            }
            Fixed(SourceName::Oecd, vec!["DF_X"]).search(query, limit)
        }
    }

    fn registry() -> Arc<IndicatorRegistry> {
        Arc::new(
            IndicatorRegistry::from_yaml_str(
                "indicators:\n  - {id: wb_gini, source: worldbank, name: Gini index, tags: [inequality], lookup: {indicator: SI.POV.GINI}}\n",
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_merge_counts() {
        let mut search = HybridSearch::new(
            registry(),
            vec![
                Box::new(Fixed(SourceName::WorldBank, vec!["A", "B"])),
                Box::new(Broken),
            ],
            "/nonexistent",
            Duration::from_secs(60),
        );
        let result = search.search("gini", &SearchOptions::default());

        assert_eq!(result.local.len(), 1);
        assert_eq!(result.remote.len(), 2);
        assert_eq!(result.total, 3);
        assert_eq!(result.sources.values().sum::<usize>(), result.total);
        assert_eq!(result.sources["imf"], 0);
        assert!(result.status["imf"].contains("connection refused"));
        assert!(!result.all_ok());
        assert!(!result.local[0].downloaded);
    }

    #[test]
    fn test_local_only_skips_remote() {
        let mut search = HybridSearch::new(
            registry(),
            vec![Box::new(Fixed(SourceName::WorldBank, vec!["A"]))],
            "/nonexistent",
            Duration::from_secs(60),
        );
        let result = search.search("gini", &SearchOptions::default().local_only());
        assert!(result.remote.is_empty());
        assert_eq!(result.sources.len(), 1);
        assert!(result.status.is_empty());
    }

    #[test]
    fn test_source_filter_limits_searchers() {
        let mut search = HybridSearch::new(
            registry(),
            vec![
                Box::new(Fixed(SourceName::WorldBank, vec!["A"])),
                Box::new(Broken),
            ],
            "/nonexistent",
            Duration::from_secs(60),
        );
        assert_eq!(search.remote_sources(), vec![SourceName::WorldBank, SourceName::Imf]);
        let result = search.search("", &SearchOptions::default().with_source(SourceName::WorldBank));
        assert!(!result.sources.contains_key("imf"));
        assert!(result.all_ok());
    }

    #[test]
    fn test_second_search_is_cached() {
        let mut search = HybridSearch::new(registry(), vec![], "/nonexistent", Duration::from_secs(60));
        assert!(!search.search("gini", &SearchOptions::default()).cached);
        assert!(search.search("  GINI ", &SearchOptions::default()).cached);
        assert!(!search.search("gini", &SearchOptions::default().local_only()).cached);
    }

    #[test]
    fn test_cache_hit_reports_callers_query() {
        let mut search = HybridSearch::new(registry(), vec![], "/nonexistent", Duration::from_secs(60));
        assert_eq!(search.search("gini", &SearchOptions::default()).query, "gini");
        let hit = search.search("  GINI ", &SearchOptions::default());
        assert!(hit.cached);
        assert_eq!(hit.query, "  GINI ");
    }

    #[test]
    fn test_failed_search_is_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut search = HybridSearch::new(
            registry(),
            vec![Box::new(Flaky(calls.clone()))],
            "/nonexistent",
            Duration::from_secs(60),
        );

        let first = search.search("gini", &SearchOptions::default());
        assert!(!first.all_ok());
        assert!(first.remote.is_empty());

        let second = search.search("gini", &SearchOptions::default());
        assert!(!second.cached);
        assert!(second.all_ok());
        assert_eq!(second.remote.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert!(search.search("gini", &SearchOptions::default()).cached);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_searchers_sharing_a_source_accumulate() {
        let mut search = HybridSearch::new(
            registry(),
            vec![
                Box::new(Fixed(SourceName::WorldBank, vec!["A", "B"])),
                Box::new(Fixed(SourceName::WorldBank, vec!["C"])),
            ],
            "/nonexistent",
            Duration::from_secs(60),
        );
        let result = search.search("gini", &SearchOptions::default());

        assert_eq!(result.remote.len(), 3);
        assert_eq!(result.sources["worldbank"], 3);
        assert_eq!(result.sources.values().sum::<usize>(), result.total);
        assert_eq!(result.status["worldbank"], "ok");
    }

    #[test]
    fn test_shared_source_failure_wins_status() {
        struct BrokenBank;

        impl RemoteSearcher for BrokenBank {
            fn source(&self) -> SourceName {
                SourceName::WorldBank
            }

            fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchHit>> {
                Err(DataSourceError::Network {
                    provider: SourceName::WorldBank,
                    cause: "reset".into(),
                }
                .into())
            }
        }

        let mut search = HybridSearch::new(
            registry(),
            vec![
                Box::new(BrokenBank),
                Box::new(Fixed(SourceName::WorldBank, vec!["A"])),
            ],
            "/nonexistent",
            Duration::from_secs(60),
        );
        let result = search.search("gini", &SearchOptions::default());

        assert_eq!(result.sources["worldbank"], 1);
        assert_eq!(result.sources.values().sum::<usize>(), result.total);
        assert!(result.status["worldbank"].contains("reset"));
        assert!(!result.all_ok());
    }
}
