//! Ingestion: pick the adapter for a source, fetch, persist the raw table.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

use crate::countries::CountryLookup;
use crate::error::{CuratorError, DataSourceError, Result};
use crate::model::{FetchParams, SourceName};
use crate::sources::{AdapterContext, RawDataset, SourceAdapter, Transport, build_adapter};

/// A fetched raw dataset and where it was written.
#[derive(Debug, Clone)]
pub struct RawIngest {
    pub dataset: RawDataset,
    pub path: PathBuf,
}

/// Owns the adapter registry and the raw data area.
///
/// Raw files land at `{raw_root}/{source}/{source}_{YYYYMMDDTHHMMSS_ffffff}.csv`.
/// Stamps are strictly increasing per manager, so repeated ingests never
/// overwrite each other.
pub struct IngestionManager {
    adapters: HashMap<SourceName, Box<dyn SourceAdapter>>,
    raw_root: PathBuf,
    last_stamp: AtomicI64,
}

impl IngestionManager {
    /// Create a manager with no adapters.
    pub fn new(raw_root: impl Into<PathBuf>) -> Self {
        Self {
            adapters: HashMap::new(),
            raw_root: raw_root.into(),
            last_stamp: AtomicI64::new(0),
        }
    }

    /// Create a manager with an adapter for every supported source.
    pub fn with_default_adapters(
        transport: Arc<dyn Transport>,
        countries: Arc<CountryLookup>,
        raw_root: impl Into<PathBuf>,
    ) -> Self {
        let ctx = AdapterContext::new(transport, countries);
        let mut manager = Self::new(raw_root);
        for source in SourceName::ALL {
            manager.register(build_adapter(source, ctx.clone()));
        }
        manager
    }

    /// Register an adapter, replacing any previous one for the same source.
    pub fn register(&mut self, adapter: Box<dyn SourceAdapter>) {
        self.adapters.insert(adapter.source(), adapter);
    }

    /// Root directory for raw files.
    pub fn raw_root(&self) -> &Path {
        &self.raw_root
    }

    /// Sources with a registered adapter, sorted.
    pub fn sources(&self) -> Vec<SourceName> {
        let mut sources: Vec<SourceName> = self.adapters.keys().copied().collect();
        sources.sort();
        sources
    }

    /// Fetch from the source named `source` and persist the raw table.
    pub fn ingest(&self, source: &str, params: &FetchParams) -> Result<RawIngest> {
        let name: SourceName = source.parse()?;
        self.ingest_source(name, params)
    }

    /// Fetch from `source` and persist the raw table.
    pub fn ingest_source(&self, source: SourceName, params: &FetchParams) -> Result<RawIngest> {
        let adapter = self
            .adapters
            .get(&source)
            .ok_or_else(|| CuratorError::UnknownSource(source.to_string()))?;

        tracing::info!(
            %source,
            indicator = params.indicator.as_deref().unwrap_or(""),
            countries = params.countries.len(),
            "fetching"
        );

        let dataset = adapter.fetch(params)?;
        if dataset.table.is_empty() {
            return Err(DataSourceError::empty(source, "adapter returned no rows").into());
        }

        let path = self.raw_path(source);
        dataset.table.write_csv(&path)?;
        tracing::info!(
            %source,
            rows = dataset.row_count(),
            path = %path.display(),
            hash = %dataset.hash,
            "stored raw dataset"
        );

        Ok(RawIngest { dataset, path })
    }

    fn raw_path(&self, source: SourceName) -> PathBuf {
        let stamp = self.next_stamp().format("%Y%m%dT%H%M%S_%6f");
        self.raw_root
            .join(source.as_str())
            .join(format!("{}_{}.csv", source.as_str(), stamp))
    }

    /// Current time, bumped by a microsecond past the previous stamp if needed.
    fn next_stamp(&self) -> DateTime<Utc> {
        let now = Utc::now().timestamp_micros();
        let previous = self
            .last_stamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        let micros = now.max(previous + 1);
        DateTime::from_timestamp_micros(micros).unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::DataTable;
    use crate::sources::MockTransport;
    use tempfile::TempDir;

    const WB_PAGE: &str = r#"[{"page":1,"pages":1},[
        {"country":{"id":"AR","value":"Argentina"},"countryiso3code":"ARG","date":"2020","value":42.3}]]"#;

    fn manager(dir: &TempDir, mock: MockTransport) -> IngestionManager {
        IngestionManager::with_default_adapters(
            Arc::new(mock),
            Arc::new(CountryLookup::builtin()),
            dir.path().join("raw"),
        )
    }

    struct EmptyAdapter;

    impl SourceAdapter for EmptyAdapter {
        fn source(&self) -> SourceName {
            SourceName::Imf
        }

        fn fetch(&self, _params: &FetchParams) -> Result<RawDataset> {
            Ok(RawDataset::new(
                SourceName::Imf,
                DataTable::with_headers(["entity", "time"]),
                vec![],
                &[],
            ))
        }
    }

    #[test]
    fn test_every_source_registered() {
        let dir = TempDir::new().unwrap();
        let m = manager(&dir, MockTransport::new());
        assert_eq!(m.sources(), SourceName::ALL.to_vec());
    }

    #[test]
    fn test_unknown_source() {
        let dir = TempDir::new().unwrap();
        let err = manager(&dir, MockTransport::new())
            .ingest("eurostat", &FetchParams::new("x"))
            .unwrap_err();
        assert!(matches!(err, CuratorError::UnknownSource(ref s) if s == "eurostat"));
    }

    #[test]
    fn test_ingest_writes_new_file_each_time() {
        let dir = TempDir::new().unwrap();
        let m = manager(&dir, MockTransport::new().respond("api.worldbank.org", WB_PAGE));
        let params = FetchParams::new("SI.POV.GINI").with_countries(["ARG"]);

        let a = m.ingest("worldbank", &params).unwrap();
        let b = m.ingest("wb", &params).unwrap();
        assert_ne!(a.path, b.path);
        assert!(a.path.starts_with(dir.path().join("raw").join("worldbank")));

        let name = a.path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("worldbank_"));
        assert_eq!(name.len(), "worldbank_20240101T000000_000000.csv".len());
        assert!(a.path.exists() && b.path.exists());
    }

    #[test]
    fn test_adapter_errors_propagate() {
        let dir = TempDir::new().unwrap();
        let m = manager(&dir, MockTransport::new().respond_with("api.worldbank.org", 503, "down"));
        let err = m.ingest("worldbank", &FetchParams::new("SI.POV.GINI")).unwrap_err();
        assert!(matches!(
            err,
            CuratorError::DataSource(DataSourceError::Http { status: 503, .. })
        ));
    }

    #[test]
    fn test_empty_adapter_output_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut m = IngestionManager::new(dir.path());
        m.register(Box::new(EmptyAdapter));
        let err = m.ingest("imf", &FetchParams::new("x")).unwrap_err();
        assert!(matches!(err, CuratorError::DataSource(DataSourceError::Empty { .. })));
    }
}
