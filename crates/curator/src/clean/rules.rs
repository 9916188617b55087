//! Cleaning rules, loaded from the `cleaning:` section of the settings.

use serde::{Deserialize, Serialize};

/// Columns that carry the country, in precedence order.
pub const COUNTRY_CANDIDATES: &[&str] = &[
    "country",
    "iso3",
    "iso_code",
    "country_code",
    "code",
    "ref_area",
    "entity",
    "country_name",
    "country name",
];

/// Columns that carry the observation time, in precedence order.
pub const YEAR_CANDIDATES: &[&str] = &["year", "time", "time_period", "date", "period"];

/// Value columns named by providers; always treated as measurements.
pub const PROVIDER_VALUE_COLUMNS: &[&str] = &["value", "obs_value"];

/// Standardization rules applied by the cleaner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningRules {
    /// Columns always coerced to numbers (matched case-insensitively).
    pub measurement_columns: Vec<String>,

    /// Share of non-null cells that must parse as finite numbers for a
    /// column to be inferred as a measurement.
    pub numeric_threshold: f64,

    /// Inclusive lower bound on kept years.
    pub start_year: Option<i32>,

    /// Inclusive upper bound on kept years.
    pub end_year: Option<i32>,
}

impl Default for CleaningRules {
    fn default() -> Self {
        Self {
            measurement_columns: Vec::new(),
            numeric_threshold: 0.8,
            start_year: None,
            end_year: None,
        }
    }
}

impl CleaningRules {
    /// Restrict output to `[start, end]`; `None` leaves that side open.
    pub fn with_years(mut self, start: Option<i32>, end: Option<i32>) -> Self {
        self.start_year = start;
        self.end_year = end;
        self
    }

    /// Whether `year` lies in the configured range.
    pub fn year_in_range(&self, year: i32) -> bool {
        self.start_year.is_none_or(|s| year >= s) && self.end_year.is_none_or(|e| year <= e)
    }

    /// Whether `column` is configured or provider-named as a measurement.
    pub fn is_declared_measurement(&self, column: &str) -> bool {
        PROVIDER_VALUE_COLUMNS
            .iter()
            .any(|c| c.eq_ignore_ascii_case(column))
            || self
                .measurement_columns
                .iter()
                .any(|c| c.eq_ignore_ascii_case(column))
    }
}
