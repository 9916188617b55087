//! Standardization of raw provider tables into canonical datasets.

mod cleaner;
mod dataset;
mod rules;
mod year;

pub use cleaner::{COUNTRY_COLUMN, CleanReport, DataCleaner, YEAR_COLUMN};
pub use dataset::{CanonicalDataset, slugify};
pub use rules::{COUNTRY_CANDIDATES, CleaningRules, PROVIDER_VALUE_COLUMNS, YEAR_CANDIDATES};
pub use year::parse_year;
