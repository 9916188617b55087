//! The source adapter capability and the raw dataset it produces.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::clean::parse_year;
use crate::countries::CountryLookup;
use crate::error::Result;
use crate::input::{CODE_COLUMN, DataTable, ENTITY_COLUMN, TIME_COLUMN, cell_at};
use crate::model::{FetchParams, SourceName};

use super::transport::Transport;

/// Provider output before cleaning, with provenance.
#[derive(Debug, Clone)]
pub struct RawDataset {
    /// Provider that produced the table.
    pub provider: SourceName,
    /// Provider-native table with working names for entity/code/time.
    pub table: DataTable,
    /// Every URL requested to build the table.
    pub urls: Vec<String>,
    /// When the fetch completed.
    pub fetched_at: DateTime<Utc>,
    /// SHA-256 over the response payloads, `sha256:<hex>`.
    pub hash: String,
}

impl RawDataset {
    /// Wrap a parsed table, hashing the payloads it came from.
    pub fn new(provider: SourceName, table: DataTable, urls: Vec<String>, payloads: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for payload in payloads {
            hasher.update(payload.as_bytes());
        }
        let hash = format!("sha256:{:x}", hasher.finalize());

        Self {
            provider,
            table,
            urls,
            fetched_at: Utc::now(),
            hash,
        }
    }

    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }
}

/// One statistical provider.
///
/// Implementations build the provider query, GET it through the shared
/// [`Transport`], parse CSV or JSON into a [`DataTable`] and rename the
/// entity, code and time columns to their working names. Full
/// standardization is left to the cleaner.
pub trait SourceAdapter: Send + Sync {
    /// The provider this adapter serves.
    fn source(&self) -> SourceName;

    /// Fetch observations for `params`.
    fn fetch(&self, params: &FetchParams) -> Result<RawDataset>;
}

/// Collaborators every adapter receives.
#[derive(Clone)]
pub struct AdapterContext {
    pub transport: Arc<dyn Transport>,
    pub countries: Arc<CountryLookup>,
}

impl AdapterContext {
    pub fn new(transport: Arc<dyn Transport>, countries: Arc<CountryLookup>) -> Self {
        Self {
            transport,
            countries,
        }
    }

    /// Map requested countries to ISO-3, passing unknown names through.
    pub fn request_codes(&self, provider: SourceName, countries: &[String]) -> Vec<String> {
        let (codes, unresolved) = self.countries.resolve_all(countries);
        for name in &unresolved {
            tracing::warn!(%provider, country = %name, "country name not in lookup table; passing through");
        }
        codes
    }
}

/// Keep rows inside the requested year range and country filter.
///
/// Used by providers whose API cannot filter server-side. A row matches a
/// requested country when its `code` or `entity` resolves to the same ISO-3,
/// or equals the requested value verbatim.
pub fn filter_observations(
    table: &mut DataTable,
    params: &FetchParams,
    lookup: &CountryLookup,
    wanted_codes: &[String],
) {
    let time_idx = table.column_index(TIME_COLUMN);
    let code_idx = table.column_index(CODE_COLUMN);
    let entity_idx = table.column_index(ENTITY_COLUMN);

    let wanted: HashSet<String> = wanted_codes.iter().map(|c| c.to_uppercase()).collect();

    table.retain_rows(|row| {
        if params.start_year.is_some() || params.end_year.is_some() {
            let year = time_idx.and_then(|i| parse_year(cell_at(row, i)));
            match year {
                Some(y) if params.year_in_range(y) => {}
                _ => return false,
            }
        }

        if wanted.is_empty() {
            return true;
        }

        [code_idx, entity_idx].into_iter().flatten().any(|i| {
            let cell = cell_at(row, i).trim();
            let resolved = lookup.resolve(cell).unwrap_or(cell);
            wanted.contains(&resolved.to_uppercase())
        })
    });
}
