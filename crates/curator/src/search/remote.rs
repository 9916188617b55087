//! Live indicator search against provider catalogs.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{DataSourceError, Result};
use crate::model::SourceName;
use crate::sources::{Transport, build_url, fetch_text, str_at};

use super::result::SearchHit;

/// A provider whose indicator catalog can be searched live.
pub trait RemoteSearcher: Send + Sync {
    /// The provider searched.
    fn source(&self) -> SourceName;

    /// Up to `limit` indicators matching `query`.
    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;
}

fn matches(needle: &str, fields: &[&str]) -> bool {
    needle.is_empty() || fields.iter().any(|f| f.to_lowercase().contains(needle))
}

// =============================================================================
// World Bank
// =============================================================================

const WB_INDICATORS_URL: &str = "https://api.worldbank.org/v2/indicator";

/// World Development Indicators source id.
const WB_WDI_SOURCE: &str = "2";

/// World Bank indicator list (WDI), filtered client-side.
pub struct WorldBankSearch {
    transport: Arc<dyn Transport>,
}

impl WorldBankSearch {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

impl RemoteSearcher for WorldBankSearch {
    fn source(&self) -> SourceName {
        SourceName::WorldBank
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let url = build_url(
            WB_INDICATORS_URL,
            &[
                ("format", "json".to_string()),
                ("per_page", "20000".to_string()),
                ("source", WB_WDI_SOURCE.to_string()),
            ],
        )?;
        let body = fetch_text(self.transport.as_ref(), SourceName::WorldBank, &url)?;
        let json: Value = serde_json::from_str(&body)
            .map_err(|e| DataSourceError::malformed(SourceName::WorldBank, e.to_string()))?;
        let records = json
            .get(1)
            .and_then(Value::as_array)
            .ok_or_else(|| DataSourceError::malformed(SourceName::WorldBank, "expected [meta, indicators]"))?;

        let needle = query.trim().to_lowercase();
        let hits = records
            .iter()
            .filter_map(|record| {
                let id = str_at(record, &["id"])?;
                let name = str_at(record, &["name"]).unwrap_or_default();
                let note = str_at(record, &["sourceNote"]).unwrap_or_default();
                if !matches(&needle, &[id.as_str(), name.as_str(), note.as_str()]) {
                    return None;
                }
                let topics = record
                    .get("topics")
                    .and_then(Value::as_array)
                    .map(|ts| ts.iter().filter_map(|t| str_at(t, &["value"])).collect())
                    .unwrap_or_default();
                Some(SearchHit {
                    url: Some(format!("https://data.worldbank.org/indicator/{}", id)),
                    code: id.clone(),
                    id,
                    source: SourceName::WorldBank,
                    name,
                    description: note,
                    tags: topics,
                    downloaded: false,
                })
            })
            .take(limit)
            .collect();
        Ok(hits)
    }
}

// =============================================================================
// IMF
// =============================================================================

const IMF_INDICATORS_URL: &str = "https://www.imf.org/external/datamapper/api/v1/indicators";

/// IMF DataMapper indicator list, filtered client-side.
pub struct ImfSearch {
    transport: Arc<dyn Transport>,
}

impl ImfSearch {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

impl RemoteSearcher for ImfSearch {
    fn source(&self) -> SourceName {
        SourceName::Imf
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let body = fetch_text(self.transport.as_ref(), SourceName::Imf, IMF_INDICATORS_URL)?;
        let json: Value = serde_json::from_str(&body)
            .map_err(|e| DataSourceError::malformed(SourceName::Imf, e.to_string()))?;
        let indicators = json
            .get("indicators")
            .and_then(Value::as_object)
            .ok_or_else(|| DataSourceError::malformed(SourceName::Imf, "missing 'indicators' object"))?;

        let needle = query.trim().to_lowercase();
        let hits = indicators
            .iter()
            .filter_map(|(code, info)| {
                let label = str_at(info, &["label"]).unwrap_or_default();
                let description = str_at(info, &["description"]).unwrap_or_default();
                if label.is_empty() || !matches(&needle, &[code.as_str(), label.as_str(), description.as_str()]) {
                    return None;
                }
                let tags = str_at(info, &["dataset"]).into_iter().collect();
                Some(SearchHit {
                    id: code.clone(),
                    source: SourceName::Imf,
                    name: label,
                    description,
                    tags,
                    code: code.clone(),
                    url: Some(format!("https://www.imf.org/external/datamapper/{}", code)),
                    downloaded: false,
                })
            })
            .take(limit)
            .collect();
        Ok(hits)
    }
}

/// The live searchers shipped with the crate.
pub fn default_searchers(transport: Arc<dyn Transport>) -> Vec<Box<dyn RemoteSearcher>> {
    vec![
        Box::new(WorldBankSearch::new(transport.clone())),
        Box::new(ImfSearch::new(transport)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CuratorError;
    use crate::sources::MockTransport;

    const WB_LIST: &str = r#"[{"page":1,"pages":1,"per_page":20000,"total":3},[
        {"id":"SI.POV.GINI","name":"Gini index","sourceNote":"Gini index measures inequality","topics":[{"id":"11","value":"Poverty "}]},
        {"id":"NY.GDP.PCAP.CD","name":"GDP per capita (current US$)","sourceNote":"GDP per capita is gross domestic product divided by midyear population.","topics":[]},
        {"id":"SL.UEM.TOTL.ZS","name":"Unemployment, total","sourceNote":"","topics":null}]]"#;

    const IMF_LIST: &str = r#"{"indicators":{
        "NGDP_RPCH":{"label":"Real GDP growth","description":"Annual percentages of constant price GDP","source":"WEO","unit":"Annual percent change","dataset":"WEO"},
        "PCPIPCH":{"label":"Inflation rate, average consumer prices","description":"","dataset":"WEO"},
        "":{"label":null}}}"#;

    #[test]
    fn test_worldbank_filters_client_side() {
        let mock = Arc::new(MockTransport::new().respond("/v2/indicator", WB_LIST));
        let wb = WorldBankSearch::new(mock.clone());

        let hits = wb.search("gdp", 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, "NY.GDP.PCAP.CD");
        assert_eq!(wb.search("", 2).unwrap().len(), 2);
        assert_eq!(wb.search("INEQUALITY", 10).unwrap()[0].tags, vec!["Poverty "]);
        assert_eq!(mock.calls(), 3);
    }

    #[test]
    fn test_imf_filters_client_side() {
        let imf = ImfSearch::new(Arc::new(MockTransport::new().respond("/indicators", IMF_LIST)));
        let hits = imf.search("inflation", 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "PCPIPCH");
        assert_eq!(imf.search("", 10).unwrap().len(), 2);
    }

    #[test]
    fn test_http_failure_surfaces_as_data_source_error() {
        let imf = ImfSearch::new(Arc::new(MockTransport::new().respond_with("/indicators", 500, "oops")));
        assert!(matches!(
            imf.search("gdp", 10),
            Err(CuratorError::DataSource(DataSourceError::Http { status: 500, .. }))
        ));
    }
}
