//! Hybrid search over the registry and mocked provider catalogs.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use curator::search::{HybridSearch, LOCAL_KEY, default_searchers};
use curator::{IndicatorRegistry, MockTransport, SearchOptions, SourceName};

const REGISTRY: &str = r#"
indicators:
  - id: wb_gini
    source: worldbank
    name: Gini index
    description: Income inequality
    tags: [inequality]
    lookup: { indicator: SI.POV.GINI }
  - id: imf_growth
    source: imf
    name: Real GDP growth
    tags: [growth]
    lookup: { database: WEO, code: NGDP_RPCH }
  - id: ilo_unemployment
    source: ilostat
    name: Unemployment rate
    tags: [labour]
    lookup: { indicator: UNE_DEAP_SEX_AGE_RT_A }
"#;

const WB_LIST: &str = r#"[{"page":1,"pages":1,"per_page":20000,"total":2},[
    {"id":"SI.POV.GINI","name":"Gini index","sourceNote":"Income inequality","topics":[{"id":"11","value":"Poverty"}]},
    {"id":"NY.GDP.MKTP.KD.ZG","name":"GDP growth (annual %)","sourceNote":"Annual GDP growth","topics":[]}]]"#;

const IMF_LIST: &str = r#"{"indicators":{
    "NGDP_RPCH":{"label":"Real GDP growth","description":"Annual percentages of constant price GDP","dataset":"WEO"},
    "PCPIPCH":{"label":"Inflation rate, average consumer prices","description":"","dataset":"WEO"}}}"#;

fn registry() -> Arc<IndicatorRegistry> {
    Arc::new(IndicatorRegistry::from_yaml_str(REGISTRY).unwrap())
}

fn engine(mock: Arc<MockTransport>, clean_root: &std::path::Path, ttl: Duration) -> HybridSearch {
    HybridSearch::new(registry(), default_searchers(mock), clean_root, ttl)
}

fn both_providers() -> Arc<MockTransport> {
    Arc::new(
        MockTransport::new()
            .respond("/v2/indicator", WB_LIST)
            .respond("/datamapper/api/v1/indicators", IMF_LIST),
    )
}

// =============================================================================
// Merge Tests
// =============================================================================

#[test]
fn test_counts_add_up() {
    let dir = TempDir::new().unwrap();
    let mut search = engine(both_providers(), dir.path(), Duration::from_secs(60));

    let result = search.search("growth", &SearchOptions::default());

    assert_eq!(result.local.len(), 1);
    assert_eq!(result.local[0].id, "imf_growth");
    assert_eq!(result.remote.len(), 2);
    assert_eq!(result.total, result.local.len() + result.remote.len());
    assert_eq!(result.sources.values().sum::<usize>(), result.total);
    assert_eq!(result.sources[LOCAL_KEY], 1);
    assert_eq!(result.sources["worldbank"], 1);
    assert_eq!(result.sources["imf"], 1);
    assert!(result.all_ok());
}

#[test]
fn test_remote_limit_applies_per_provider() {
    let dir = TempDir::new().unwrap();
    let mut search = engine(both_providers(), dir.path(), Duration::from_secs(60));
    let options = SearchOptions {
        max_remote: 1,
        ..SearchOptions::default()
    };

    let result = search.search("", &options);
    assert_eq!(result.sources["worldbank"], 1);
    assert_eq!(result.sources["imf"], 1);
}

#[test]
fn test_partial_failure_keeps_other_results() {
    let dir = TempDir::new().unwrap();
    let mock = Arc::new(
        MockTransport::new()
            .respond("/v2/indicator", WB_LIST)
            .fail("/datamapper/api/v1/indicators", "connection reset"),
    );
    let mut search = engine(mock, dir.path(), Duration::from_secs(60));

    let result = search.search("gini", &SearchOptions::default());

    assert_eq!(result.local.len(), 1);
    assert_eq!(result.sources["worldbank"], 1);
    assert_eq!(result.sources["imf"], 0);
    assert_eq!(result.status["worldbank"], "ok");
    assert!(result.status["imf"].contains("connection reset"));
    assert_eq!(result.sources.values().sum::<usize>(), result.total);
}

#[test]
fn test_tag_filter_applies_to_catalog() {
    let dir = TempDir::new().unwrap();
    let mut search = engine(both_providers(), dir.path(), Duration::from_secs(60));

    let result = search.search("", &SearchOptions::default().local_only().with_tag("LABOUR"));
    assert_eq!(result.local.len(), 1);
    assert_eq!(result.local[0].source, SourceName::Ilostat);
}

#[test]
fn test_downloaded_flag_from_clean_directory() {
    let dir = TempDir::new().unwrap();
    let topic_dir = dir.path().join("inequality");
    fs::create_dir_all(&topic_dir).unwrap();
    fs::write(
        topic_dir.join("inequality_worldbank_latam_2020_2022.csv"),
        "country,year,value\nARG,2020,42.3\n",
    )
    .unwrap();

    let mut search = engine(both_providers(), dir.path(), Duration::from_secs(60));
    let result = search.search("", &SearchOptions::default().local_only());

    let flags: Vec<(&str, bool)> = result.local.iter().map(|h| (h.id.as_str(), h.downloaded)).collect();
    assert!(flags.contains(&("wb_gini", true)));
    assert!(flags.contains(&("imf_growth", false)));
}

// =============================================================================
// Cache Tests
// =============================================================================

#[test]
fn test_repeat_search_served_from_cache() {
    let dir = TempDir::new().unwrap();
    let mock = both_providers();
    let mut search = engine(mock.clone(), dir.path(), Duration::from_secs(60));

    let first = search.search("gdp", &SearchOptions::default());
    let calls = mock.calls();
    let second = search.search("gdp", &SearchOptions::default());

    assert_eq!(mock.calls(), calls);
    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(second.total, first.total);
}

#[test]
fn test_zero_ttl_disables_cache() {
    let dir = TempDir::new().unwrap();
    let mock = both_providers();
    let mut search = engine(mock.clone(), dir.path(), Duration::ZERO);

    search.search("gdp", &SearchOptions::default());
    let calls = mock.calls();
    let second = search.search("gdp", &SearchOptions::default());

    assert_eq!(mock.calls(), calls * 2);
    assert!(!second.cached);
}

#[test]
fn test_expired_entry_calls_remotes_again() {
    let dir = TempDir::new().unwrap();
    let mock = both_providers();
    let mut search = engine(mock.clone(), dir.path(), Duration::from_millis(50));

    search.search("gdp", &SearchOptions::default());
    let calls = mock.calls();
    assert!(search.search("gdp", &SearchOptions::default()).cached);
    assert_eq!(mock.calls(), calls);

    std::thread::sleep(Duration::from_millis(120));
    let refreshed = search.search("gdp", &SearchOptions::default());

    assert!(!refreshed.cached);
    assert_eq!(mock.calls(), calls * 2);
}

#[test]
fn test_clear_cache_forces_refetch() {
    let dir = TempDir::new().unwrap();
    let mock = both_providers();
    let mut search = engine(mock.clone(), dir.path(), Duration::from_secs(60));

    search.search("gdp", &SearchOptions::default());
    search.clear_cache();
    let result = search.search("gdp", &SearchOptions::default());

    assert!(!result.cached);
    assert_eq!(mock.calls(), 4);
}
