//! Main Curator struct and pipeline API.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::clean::{CanonicalDataset, CleaningRules, DataCleaner};
use crate::config::{IndicatorRegistry, Settings};
use crate::countries::CountryLookup;
use crate::error::{CuratorError, Result};
use crate::ingest::IngestionManager;
use crate::input::Parser;
use crate::metadata::MetadataGenerator;
use crate::model::{FetchParams, IndicatorDescriptor, SourceName};
use crate::search::{HybridSearch, default_searchers};
use crate::sources::{RawDataset, ReqwestTransport, Transport};

/// One pipeline run: what to fetch and how to label the output.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    /// Source name as typed by the caller (`worldbank`, `wb`, ...).
    pub source: String,
    pub params: FetchParams,
    /// Topic label: output subdirectory and file-name prefix.
    pub topic: String,
    /// Geographic scope label used in the file name.
    pub coverage: String,
}

impl PipelineRequest {
    pub fn new(
        source: impl Into<String>,
        params: FetchParams,
        topic: impl Into<String>,
        coverage: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            params,
            topic: topic.into(),
            coverage: coverage.into(),
        }
    }
}

/// Where the raw data came from.
#[derive(Debug, Clone, Serialize)]
pub struct Provenance {
    pub urls: Vec<String>,
    pub fetched_at: DateTime<Utc>,
    pub hash: String,
}

impl From<&RawDataset> for Provenance {
    fn from(raw: &RawDataset) -> Self {
        Self {
            urls: raw.urls.clone(),
            fetched_at: raw.fetched_at,
            hash: raw.hash.clone(),
        }
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub source: SourceName,
    pub topic: String,
    pub coverage: String,
    /// Registry id, when the run started from one.
    pub indicator_id: Option<String>,
    /// Provider code that was fetched.
    pub indicator_code: Option<String>,
    pub canonical_path: PathBuf,
    pub raw_path: PathBuf,
    pub metadata_path: Option<PathBuf>,
    pub rows: usize,
    pub columns: usize,
    pub resolved_countries: usize,
    pub unresolved_values: Vec<String>,
    pub year_range: (i32, i32),
    /// Canonical column names.
    pub column_names: Vec<String>,
    pub measurement_columns: Vec<String>,
    /// Distinct country values, sorted.
    pub countries: Vec<String>,
    pub provenance: Option<Provenance>,
}

/// Fetch, clean, persist and describe indicator datasets.
pub struct Curator {
    settings: Settings,
    registry: Arc<IndicatorRegistry>,
    countries: Arc<CountryLookup>,
    transport: Arc<dyn Transport>,
    ingestion: IngestionManager,
    cleaner: DataCleaner,
    metadata: MetadataGenerator,
}

impl Curator {
    /// Create a curator over an explicit transport.
    pub fn new(settings: Settings, registry: IndicatorRegistry, transport: Arc<dyn Transport>) -> Self {
        let countries = Arc::new(settings.country_lookup());
        let ingestion = IngestionManager::with_default_adapters(
            transport.clone(),
            countries.clone(),
            settings.paths.raw_data.clone(),
        );
        let cleaner = DataCleaner::new(countries.clone());
        let metadata = MetadataGenerator::new(settings.paths.metadata.clone());

        Self {
            settings,
            registry: Arc::new(registry),
            countries,
            transport,
            ingestion,
            cleaner,
            metadata,
        }
    }

    /// Create a curator that talks to the real providers.
    pub fn from_settings(settings: Settings, registry: IndicatorRegistry) -> Result<Self> {
        let transport = ReqwestTransport::with_options(settings.http.timeout(), &settings.http.user_agent)?;
        Ok(Self::new(settings, registry, Arc::new(transport)))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &IndicatorRegistry {
        &self.registry
    }

    pub fn countries(&self) -> &CountryLookup {
        &self.countries
    }

    pub fn ingestion(&self) -> &IngestionManager {
        &self.ingestion
    }

    /// A hybrid search over this curator's registry and transport.
    pub fn search_engine(&self) -> HybridSearch {
        HybridSearch::new(
            self.registry.clone(),
            default_searchers(self.transport.clone()),
            self.settings.paths.clean_data.clone(),
            self.settings.search.cache_ttl(),
        )
    }

    /// Ingest, clean, persist and describe one dataset.
    pub fn run(&self, request: &PipelineRequest) -> Result<PipelineSummary> {
        self.run_with(request, None)
    }

    /// Run the pipeline for a registry indicator.
    pub fn run_indicator(
        &self,
        id: &str,
        topic: &str,
        coverage: &str,
        countries: Vec<String>,
        start_year: Option<i32>,
        end_year: Option<i32>,
    ) -> Result<PipelineSummary> {
        let descriptor = self
            .registry
            .get(id)
            .ok_or_else(|| CuratorError::Config(format!("Unknown indicator id '{}'", id)))?;

        let params = descriptor
            .fetch_params()
            .with_countries(countries)
            .with_years(start_year, end_year);
        let request = PipelineRequest::new(descriptor.source.as_str(), params, topic, coverage);
        self.run_with(&request, Some(descriptor))
    }

    fn run_with(
        &self,
        request: &PipelineRequest,
        descriptor: Option<&IndicatorDescriptor>,
    ) -> Result<PipelineSummary> {
        let source: SourceName = request.source.parse()?;
        self.settings.validate_source(source)?;
        self.settings.validate_topic(&request.topic)?;

        let mut params = request.params.clone();
        if params.countries.is_empty() {
            params.countries = self.settings.default_countries.clone();
        }

        // Fetch and keep the raw table
        let raw = self.ingestion.ingest_source(source, &params)?;

        // Standardize
        let rules = self.rules(params.start_year, params.end_year);
        let dataset = self.cleaner.clean(&raw.dataset.table, &rules)?;
        let canonical_path = dataset.persist(
            &self.settings.paths.clean_data,
            &request.topic,
            source,
            &request.coverage,
        )?;

        let mut summary = summarize(
            &dataset,
            source,
            request,
            canonical_path,
            raw.path,
            Some(Provenance::from(&raw.dataset)),
        );
        summary.indicator_id = descriptor.map(|d| d.id.clone());
        summary.indicator_code = params.indicator.clone();

        // Describe
        let markdown = self.metadata.render(&summary, descriptor);
        summary.metadata_path = Some(self.metadata.write(&request.topic, &markdown)?);

        tracing::info!(
            %source,
            topic = %request.topic,
            path = %summary.canonical_path.display(),
            "pipeline complete"
        );
        Ok(summary)
    }

    /// Clean a previously stored raw file without fetching.
    pub fn clean_file(
        &self,
        raw_path: impl AsRef<Path>,
        source: SourceName,
        topic: &str,
        coverage: &str,
        start_year: Option<i32>,
        end_year: Option<i32>,
    ) -> Result<PipelineSummary> {
        let raw_path = raw_path.as_ref();
        self.settings.validate_topic(topic)?;

        let table = Parser::new().parse_file(raw_path)?;
        let dataset = self.cleaner.clean(&table, &self.rules(start_year, end_year))?;
        let canonical_path = dataset.persist(&self.settings.paths.clean_data, topic, source, coverage)?;

        let request = PipelineRequest::new(source.as_str(), FetchParams::default(), topic, coverage);
        Ok(summarize(
            &dataset,
            source,
            &request,
            canonical_path,
            raw_path.to_path_buf(),
            None,
        ))
    }

    fn rules(&self, start_year: Option<i32>, end_year: Option<i32>) -> CleaningRules {
        let configured = &self.settings.cleaning;
        configured.clone().with_years(
            start_year.or(configured.start_year),
            end_year.or(configured.end_year),
        )
    }
}

fn summarize(
    dataset: &CanonicalDataset,
    source: SourceName,
    request: &PipelineRequest,
    canonical_path: PathBuf,
    raw_path: PathBuf,
    provenance: Option<Provenance>,
) -> PipelineSummary {
    let report = &dataset.report;
    let countries: BTreeSet<String> = dataset
        .table
        .column_values(0)
        .map(str::to_string)
        .collect();

    PipelineSummary {
        source,
        topic: request.topic.clone(),
        coverage: request.coverage.clone(),
        indicator_id: None,
        indicator_code: None,
        canonical_path,
        raw_path,
        metadata_path: None,
        rows: report.rows,
        columns: report.columns,
        resolved_countries: report.resolved_countries,
        unresolved_values: report.unresolved_values.clone(),
        year_range: report.year_range,
        column_names: dataset.table.headers.clone(),
        measurement_columns: report.measurement_columns.clone(),
        countries: countries.into_iter().collect(),
        provenance,
    }
}
