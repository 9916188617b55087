//! Curator: fetch, clean and catalog economic indicators.
//!
//! Curator pulls tabular series from public statistical APIs (Our World in
//! Data, World Bank, OECD, IMF, ILOSTAT, ECLAC), standardizes them into a
//! canonical `country`/`year` schema and stores them under a predictable
//! directory layout with a markdown description per topic.
//!
//! # Pipeline
//!
//! - **Ingest**: a [`SourceAdapter`] fetches the provider table; the raw
//!   table is stored with a timestamped name
//! - **Clean**: [`DataCleaner`] maps countries to ISO-3, years to integers
//!   and missing values to empty cells
//! - **Persist**: `{clean}/{topic}/{topic}_{source}_{coverage}_{start}_{end}.csv`
//! - **Describe**: `{metadata}/{topic}.md`
//!
//! # Example
//!
//! ```no_run
//! use curator::{Curator, FetchParams, IndicatorRegistry, PipelineRequest, Settings};
//!
//! let settings = Settings::load("config/settings.yaml").unwrap();
//! let registry = IndicatorRegistry::load("config/indicators.yaml").unwrap();
//! let curator = Curator::from_settings(settings, registry).unwrap();
//!
//! let params = FetchParams::new("SI.POV.GINI")
//!     .with_countries(["Argentina", "Brazil"])
//!     .with_years(Some(2020), Some(2022));
//! let summary = curator
//!     .run(&PipelineRequest::new("worldbank", params, "inequality", "latam"))
//!     .unwrap();
//!
//! println!("{} rows -> {}", summary.rows, summary.canonical_path.display());
//! ```

pub mod clean;
pub mod config;
pub mod countries;
pub mod error;
pub mod ingest;
pub mod input;
pub mod metadata;
pub mod model;
pub mod search;
pub mod sources;

mod curator;

pub use crate::curator::{Curator, PipelineRequest, PipelineSummary, Provenance};
pub use clean::{CanonicalDataset, CleanReport, CleaningRules, DataCleaner};
pub use config::{IndicatorRegistry, Settings};
pub use countries::CountryLookup;
pub use error::{CuratorError, DataSourceError, Result};
pub use ingest::{IngestionManager, RawIngest};
pub use input::DataTable;
pub use metadata::MetadataGenerator;
pub use model::{FetchParams, IndicatorDescriptor, LookupKey, SourceName};
pub use search::{HybridSearch, SearchHit, SearchOptions, SearchResultSet};
pub use sources::{MockTransport, RawDataset, ReqwestTransport, SourceAdapter, Transport};
