//! Fetch request parameters.

use serde::{Deserialize, Serialize};

use crate::error::{CuratorError, Result};

use super::source::SourceName;

/// Parameters handed to a source adapter.
///
/// Which fields are required depends on the provider; adapters report
/// absent ones as [`CuratorError::MissingParameter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchParams {
    /// Indicator code, chart slug or SDMX key.
    pub indicator: Option<String>,
    /// Dataset/database qualifier (OECD dataflow, IMF database).
    pub dataset: Option<String>,
    /// Country filter: ISO-3 codes or display names. Empty means all.
    #[serde(default)]
    pub countries: Vec<String>,
    /// First year, inclusive.
    pub start_year: Option<i32>,
    /// Last year, inclusive.
    pub end_year: Option<i32>,
}

impl FetchParams {
    /// Parameters for a single indicator code.
    pub fn new(indicator: impl Into<String>) -> Self {
        Self {
            indicator: Some(indicator.into()),
            ..Default::default()
        }
    }

    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = Some(dataset.into());
        self
    }

    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_years(mut self, start: Option<i32>, end: Option<i32>) -> Self {
        self.start_year = start;
        self.end_year = end;
        self
    }

    /// The indicator, or a `MissingParameter` error for `provider`.
    pub fn require_indicator(&self, provider: SourceName) -> Result<&str> {
        self.indicator
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(CuratorError::MissingParameter {
                provider,
                parameter: "indicator",
            })
    }

    /// The dataset, or a `MissingParameter` error for `provider`.
    pub fn require_dataset(&self, provider: SourceName) -> Result<&str> {
        self.dataset
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(CuratorError::MissingParameter {
                provider,
                parameter: "dataset",
            })
    }

    /// Reject inverted year ranges.
    pub fn validate_years(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start_year, self.end_year) {
            if start > end {
                return Err(CuratorError::InvalidRequest(format!(
                    "start year {} is after end year {}",
                    start, end
                )));
            }
        }
        Ok(())
    }

    /// Whether `year` falls inside the requested range.
    pub fn year_in_range(&self, year: i32) -> bool {
        self.start_year.is_none_or(|s| year >= s) && self.end_year.is_none_or(|e| year <= e)
    }
}
