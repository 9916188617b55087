//! Standardization of provider tables into the canonical schema.
//!
//! Output columns are `country`, `year`, then every remaining source column
//! in its original order. The columns the country and year were taken from
//! are consumed.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::countries::CountryLookup;
use crate::error::{CuratorError, Result};
use crate::input::{DataTable, cell_at};

use super::dataset::CanonicalDataset;
use super::rules::{COUNTRY_CANDIDATES, CleaningRules, YEAR_CANDIDATES};
use super::year::parse_year;

/// Canonical country column.
pub const COUNTRY_COLUMN: &str = "country";

/// Canonical year column.
pub const YEAR_COLUMN: &str = "year";

/// What a cleaning run did.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanReport {
    /// Rows in the raw table.
    pub input_rows: usize,
    /// Rows in the canonical table.
    pub rows: usize,
    /// Columns in the canonical table.
    pub columns: usize,
    /// Distinct ISO-3 codes present.
    pub resolved_countries: usize,
    /// Rows whose country kept its original value.
    pub unresolved_rows: usize,
    /// Distinct country values that could not be mapped, sorted.
    pub unresolved_values: Vec<String>,
    /// Rows where every cell was null.
    pub dropped_empty_rows: usize,
    /// Rows with no country value in any country column.
    pub dropped_no_country: usize,
    /// Rows whose time value did not parse as a year.
    pub dropped_no_year: usize,
    /// Rows outside the requested year range.
    pub dropped_out_of_range: usize,
    /// Columns removed because every value was null.
    pub dropped_columns: Vec<String>,
    /// Columns coerced to numbers.
    pub measurement_columns: Vec<String>,
    /// Inclusive `(first, last)` year present in the output.
    pub year_range: (i32, i32),
}

/// Turns raw provider tables into canonical datasets.
#[derive(Debug, Clone)]
pub struct DataCleaner {
    countries: Arc<CountryLookup>,
}

impl DataCleaner {
    /// Create a cleaner over the shared country table.
    pub fn new(countries: Arc<CountryLookup>) -> Self {
        Self { countries }
    }

    /// Standardize `raw` according to `rules`.
    ///
    /// Fails with [`CuratorError::Cleaning`] when the input is empty, when
    /// no country or year column exists, when no row survives filtering or
    /// when no country resolves to an ISO-3 code.
    pub fn clean(&self, raw: &DataTable, rules: &CleaningRules) -> Result<CanonicalDataset> {
        if raw.column_count() == 0 || raw.is_empty() {
            return Err(CuratorError::cleaning(
                "input table is empty",
                raw.row_count(),
                raw.column_count(),
            ));
        }

        let mut report = CleanReport {
            input_rows: raw.row_count(),
            ..Default::default()
        };

        let mut country_cols: Vec<usize> = Vec::new();
        for candidate in COUNTRY_CANDIDATES {
            if let Some(idx) = raw.find_column(&[*candidate]) {
                if !country_cols.contains(&idx) {
                    country_cols.push(idx);
                }
            }
        }
        if country_cols.is_empty() {
            return Err(CuratorError::cleaning(
                format!("no country column (looked for {})", COUNTRY_CANDIDATES.join(", ")),
                raw.row_count(),
                raw.column_count(),
            ));
        }

        let year_col = raw
            .find_column(YEAR_CANDIDATES)
            .filter(|idx| !country_cols.contains(idx))
            .ok_or_else(|| {
                CuratorError::cleaning(
                    format!("no year column (looked for {})", YEAR_CANDIDATES.join(", ")),
                    raw.row_count(),
                    raw.column_count(),
                )
            })?;

        let other_cols: Vec<usize> = (0..raw.column_count())
            .filter(|i| *i != year_col && !country_cols.contains(i))
            .collect();

        // Row pass: country, year and range filter.
        let mut kept: Vec<(String, i32, &Vec<String>)> = Vec::new();
        let mut resolved = BTreeSet::new();
        let mut unresolved = BTreeSet::new();

        for row in &raw.rows {
            if row.iter().all(|cell| DataTable::is_null_value(cell)) {
                report.dropped_empty_rows += 1;
                continue;
            }
            let Some(year) = parse_year(cell_at(row, year_col)) else {
                report.dropped_no_year += 1;
                continue;
            };
            if !rules.year_in_range(year) {
                report.dropped_out_of_range += 1;
                continue;
            }
            let Some((country, is_resolved)) = self.resolve_country(row, &country_cols) else {
                report.dropped_no_country += 1;
                continue;
            };

            if is_resolved {
                resolved.insert(country.clone());
            } else {
                report.unresolved_rows += 1;
                unresolved.insert(country.clone());
            }
            kept.push((country, year, row));
        }

        if kept.is_empty() {
            return Err(CuratorError::cleaning(
                format!(
                    "no rows left after filtering ({} without year, {} outside range, {} without country)",
                    report.dropped_no_year, report.dropped_out_of_range, report.dropped_no_country
                ),
                0,
                raw.column_count(),
            ));
        }
        if resolved.is_empty() {
            return Err(CuratorError::cleaning(
                format!(
                    "no country resolved to an ISO-3 code (unresolved: {})",
                    unresolved.iter().cloned().collect::<Vec<_>>().join(", ")
                ),
                kept.len(),
                raw.column_count(),
            ));
        }

        // Column pass over surviving rows: measurement inference, coercion,
        // and removal of columns left with no values.
        let mut headers = vec![COUNTRY_COLUMN.to_string(), YEAR_COLUMN.to_string()];
        let mut columns: Vec<Vec<String>> = Vec::new();

        for &col in &other_cols {
            let name = &raw.headers[col];
            let cells = kept.iter().map(|(_, _, row)| cell_at(row, col));

            let is_measurement = rules.is_declared_measurement(name)
                || looks_numeric(cells.clone(), rules.numeric_threshold);

            let values: Vec<String> = if is_measurement {
                cells.map(coerce_number).collect()
            } else {
                cells.map(normalize_text).collect()
            };

            if values.iter().all(|v| v.is_empty()) {
                report.dropped_columns.push(name.clone());
                continue;
            }
            if is_measurement {
                report.measurement_columns.push(name.clone());
            }
            headers.push(name.clone());
            columns.push(values);
        }

        let rows: Vec<Vec<String>> = kept
            .iter()
            .enumerate()
            .map(|(i, (country, year, _))| {
                let mut out = Vec::with_capacity(headers.len());
                out.push(country.clone());
                out.push(year.to_string());
                out.extend(columns.iter().map(|col| col[i].clone()));
                out
            })
            .collect();

        let first = kept.iter().map(|(_, y, _)| *y).min().unwrap_or_default();
        let last = kept.iter().map(|(_, y, _)| *y).max().unwrap_or_default();

        report.rows = rows.len();
        report.columns = headers.len();
        report.resolved_countries = resolved.len();
        report.unresolved_values = unresolved.into_iter().collect();
        report.year_range = (first, last);

        if report.unresolved_rows > 0 {
            tracing::warn!(
                rows = report.unresolved_rows,
                values = ?report.unresolved_values,
                "country values kept unresolved"
            );
        }
        tracing::info!(
            rows = report.rows,
            columns = report.columns,
            countries = report.resolved_countries,
            first_year = first,
            last_year = last,
            "cleaned dataset"
        );

        Ok(CanonicalDataset {
            table: DataTable::new(headers, rows),
            report,
        })
    }

    /// First country cell that resolves, else the first non-null one verbatim.
    fn resolve_country(&self, row: &[String], country_cols: &[usize]) -> Option<(String, bool)> {
        let candidates: Vec<&str> = country_cols
            .iter()
            .map(|&i| cell_at(row, i).trim())
            .filter(|v| !DataTable::is_null_value(v))
            .collect();

        for value in &candidates {
            if let Some(code) = self.countries.resolve(value) {
                return Some((code.to_string(), true));
            }
        }
        candidates.first().map(|v| (v.to_string(), false))
    }
}

/// A finite number, kept exactly as written.
fn parse_finite(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(trimmed),
        _ => None,
    }
}

/// Measurement cell: the trimmed number, or empty.
fn coerce_number(value: &str) -> String {
    if DataTable::is_null_value(value) {
        return String::new();
    }
    parse_finite(value).map(str::to_string).unwrap_or_default()
}

/// Text cell: trimmed, with null tokens emptied.
fn normalize_text(value: &str) -> String {
    if DataTable::is_null_value(value) {
        String::new()
    } else {
        value.trim().to_string()
    }
}

/// Whether at least `threshold` of the non-null cells are finite numbers.
fn looks_numeric<'a>(cells: impl Iterator<Item = &'a str>, threshold: f64) -> bool {
    let mut non_null = 0usize;
    let mut numeric = 0usize;
    for cell in cells {
        if DataTable::is_null_value(cell) {
            continue;
        }
        non_null += 1;
        if parse_finite(cell).is_some() {
            numeric += 1;
        }
    }
    non_null > 0 && numeric as f64 / non_null as f64 >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaner() -> DataCleaner {
        DataCleaner::new(Arc::new(CountryLookup::builtin()))
    }

    fn table(headers: &[&str], rows: &[&[&str]]) -> DataTable {
        DataTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    // =========================================================================
    // Country and year standardization
    // =========================================================================

    #[test]
    fn test_entity_time_value_becomes_canonical() {
        let raw = table(
            &["entity", "code", "time", "value"],
            &[
                &["Argentina", "ARG", "2020", "42.0"],
                &["Brazil", "", "2021.0", "48.9"],
            ],
        );
        let out = cleaner().clean(&raw, &CleaningRules::default()).unwrap();
        assert_eq!(out.table.headers, vec!["country", "year", "value"]);
        assert_eq!(out.table.rows[0], vec!["ARG", "2020", "42.0"]);
        assert_eq!(out.table.rows[1], vec!["BRA", "2021", "48.9"]);
        assert_eq!(out.report.resolved_countries, 2);
        assert_eq!(out.report.year_range, (2020, 2021));
    }

    #[test]
    fn test_any_iso3_code_resolves() {
        let raw = table(
            &["entity", "code", "time", "value"],
            &[
                &["Afghanistan", "AFG", "2020", "1.5"],
                &["Albania", "ALB", "2020", "2.5"],
                &["Tuvalu", "", "2020", "0.1"],
            ],
        );
        let out = cleaner().clean(&raw, &CleaningRules::default()).unwrap();
        assert_eq!(out.report.resolved_countries, 3);
        assert!(out.report.unresolved_values.is_empty());
        let countries: Vec<&str> = out.table.column_values(0).collect();
        assert_eq!(countries, vec!["AFG", "ALB", "TUV"]);
    }

    #[test]
    fn test_ragged_rows_do_not_panic() {
        let raw = DataTable {
            headers: vec!["country".into(), "year".into(), "v".into()],
            rows: vec![vec!["CHL".into(), "2020".into()], vec!["PER".into()]],
        };
        let out = cleaner().clean(&raw, &CleaningRules::default()).unwrap();
        assert_eq!(out.report.rows, 1);
        assert_eq!(out.report.dropped_no_year, 1);
    }

    #[test]
    fn test_unresolved_country_kept_and_counted() {
        let raw = table(
            &["Entity", "Year", "gdp"],
            &[&["Chile", "2020", "1"], &["Atlantis", "2020", "2"]],
        );
        let out = cleaner().clean(&raw, &CleaningRules::default()).unwrap();
        assert_eq!(out.table.rows[1][0], "Atlantis");
        assert_eq!(out.report.unresolved_rows, 1);
        assert_eq!(out.report.unresolved_values, vec!["Atlantis"]);
    }

    #[test]
    fn test_rows_without_year_dropped() {
        let raw = table(
            &["country", "year", "v"],
            &[&["CHL", "2020", "1"], &["CHL", "n/a", "2"], &["CHL", "", "3"]],
        );
        let out = cleaner().clean(&raw, &CleaningRules::default()).unwrap();
        assert_eq!(out.report.rows, 1);
        assert_eq!(out.report.dropped_no_year, 2);
    }

    #[test]
    fn test_explicit_year_range_filters() {
        let raw = table(
            &["country", "year", "v"],
            &[&["PER", "2014", "1"], &["PER", "2015", "2"], &["PER", "2016", "3"]],
        );
        let rules = CleaningRules::default().with_years(Some(2015), Some(2015));
        let out = cleaner().clean(&raw, &rules).unwrap();
        assert_eq!(out.report.rows, 1);
        assert_eq!(out.report.dropped_out_of_range, 2);
        assert_eq!(out.report.year_range, (2015, 2015));
    }

    // =========================================================================
    // Missing values and coercion
    // =========================================================================

    #[test]
    fn test_null_tokens_become_empty() {
        let raw = table(
            &["country", "year", "value", "note"],
            &[
                &["ARG", "2020", "NaN", "NA"],
                &["ARG", "2021", "inf", "ok"],
                &["ARG", "2022", " 3.50 ", "-"],
            ],
        );
        let out = cleaner().clean(&raw, &CleaningRules::default()).unwrap();
        let values: Vec<&str> = out.table.column_values(2).collect();
        assert_eq!(values, vec!["", "", "3.50"]);
        let notes: Vec<&str> = out.table.column_values(3).collect();
        assert_eq!(notes, vec!["", "ok", ""]);
    }

    #[test]
    fn test_inferred_measurement_nulls_stray_text() {
        let raw = table(
            &["country", "year", "rate"],
            &[
                &["ARG", "2018", "1.0"],
                &["ARG", "2019", "2.0"],
                &["ARG", "2020", "3.0"],
                &["ARG", "2021", "4.0"],
                &["ARG", "2022", "est."],
            ],
        );
        let out = cleaner().clean(&raw, &CleaningRules::default()).unwrap();
        assert_eq!(out.report.measurement_columns, vec!["rate"]);
        assert_eq!(out.table.rows[4][2], "");
    }

    #[test]
    fn test_empty_rows_and_columns_dropped() {
        let raw = table(
            &["country", "year", "value", "blank"],
            &[&["COL", "2020", "1", ""], &["", "", "..", "NA"]],
        );
        let out = cleaner().clean(&raw, &CleaningRules::default()).unwrap();
        assert_eq!(out.report.dropped_empty_rows, 1);
        assert_eq!(out.report.dropped_columns, vec!["blank"]);
        assert_eq!(out.table.headers, vec!["country", "year", "value"]);
    }

    // =========================================================================
    // Failures
    // =========================================================================

    #[test]
    fn test_empty_input_fails() {
        let err = cleaner()
            .clean(&DataTable::with_headers(["entity", "time"]), &CleaningRules::default())
            .unwrap_err();
        assert!(matches!(err, CuratorError::Cleaning { rows: 0, .. }));
    }

    #[test]
    fn test_no_rows_after_filter_fails() {
        let raw = table(&["country", "year", "v"], &[&["ARG", "1990", "1"]]);
        let rules = CleaningRules::default().with_years(Some(2000), None);
        assert!(matches!(
            cleaner().clean(&raw, &rules),
            Err(CuratorError::Cleaning { .. })
        ));
    }

    #[test]
    fn test_no_resolved_country_fails() {
        let raw = table(&["entity", "time", "v"], &[&["World", "2020", "1"]]);
        let err = cleaner().clean(&raw, &CleaningRules::default()).unwrap_err();
        assert!(err.to_string().contains("World"));
    }

    #[test]
    fn test_clean_is_idempotent() {
        let raw = table(
            &["entity", "code", "time", "sex", "value"],
            &[
                &["Argentina", "ARG", "2020-01-01", "Total", "1.25"],
                &["World", "OWID_WRL", "2020", "Total", ".."],
                &["Brasil", "", "2021", "NA", "3"],
            ],
        );
        let first = cleaner().clean(&raw, &CleaningRules::default()).unwrap();
        let second = cleaner().clean(&first.table, &CleaningRules::default()).unwrap();
        assert_eq!(first.table, second.table);
    }
}
