//! IMF DataMapper adapter.
//!
//! Required: `indicator` (e.g. `NGDP_RPCH`). Countries are path segments,
//! years a `periods=` list. The response nests values as
//! `values.{indicator}.{iso3}.{year}`; it carries no display names, so the
//! entity column is filled from the shared country table.

use chrono::{Datelike, Utc};
use serde_json::Value;

use crate::error::{DataSourceError, Result};
use crate::input::{CODE_COLUMN, DataTable, ENTITY_COLUMN, TIME_COLUMN, VALUE_COLUMN};
use crate::model::{FetchParams, SourceName};

use super::adapter::{AdapterContext, RawDataset, SourceAdapter};
use super::json::json_cell;
use super::transport::{build_url, fetch_text};

const BASE_URL: &str = "https://www.imf.org/external/datamapper/api/v1";

/// First year in the World Economic Outlook series.
const FIRST_YEAR: i32 = 1980;

pub struct ImfAdapter {
    ctx: AdapterContext,
}

impl ImfAdapter {
    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

/// Comma-separated `periods=` value for the requested range.
/// Inclusive year span to request; open ends fall back to the series bounds.
fn year_span(params: &FetchParams) -> Option<(i32, i32)> {
    match (params.start_year, params.end_year) {
        (None, None) => None,
        (Some(s), Some(e)) => Some((s, e)),
        (Some(s), None) => Some((s, Utc::now().year())),
        (None, Some(e)) => Some((FIRST_YEAR, e)),
    }
}

/// `periods=` value, or `None` when the span is unbounded or empty.
fn periods(params: &FetchParams) -> Option<String> {
    let (start, end) = year_span(params)?;
    if start > end {
        return None;
    }
    let years: Vec<String> = (start..=end).map(|y| y.to_string()).collect();
    Some(years.join(","))
}

impl SourceAdapter for ImfAdapter {
    fn source(&self) -> SourceName {
        SourceName::Imf
    }

    fn fetch(&self, params: &FetchParams) -> Result<RawDataset> {
        let indicator = params.require_indicator(SourceName::Imf)?;
        params.validate_years()?;
        if let Some((start, end)) = year_span(params) {
            if start > end {
                return Err(DataSourceError::empty(
                    SourceName::Imf,
                    format!("no {} data between {} and {}", indicator, start, end),
                )
                .into());
            }
        }

        let codes = self.ctx.request_codes(SourceName::Imf, &params.countries);
        let mut path = format!("{}/{}", BASE_URL, indicator);
        for code in &codes {
            path.push('/');
            path.push_str(code);
        }

        let query: Vec<(&str, String)> = periods(params)
            .map(|p| vec![("periods", p)])
            .unwrap_or_default();
        let url = build_url(&path, &query)?;
        let body = fetch_text(self.ctx.transport.as_ref(), SourceName::Imf, &url)?;

        let json: Value = serde_json::from_str(&body)
            .map_err(|e| DataSourceError::malformed(SourceName::Imf, e.to_string()))?;
        let values = json
            .get("values")
            .ok_or_else(|| DataSourceError::malformed(SourceName::Imf, "missing 'values' object"))?;

        let mut table = DataTable::with_headers([ENTITY_COLUMN, CODE_COLUMN, TIME_COLUMN, VALUE_COLUMN]);

        if let Some(by_country) = values.get(indicator).and_then(Value::as_object) {
            for (code, by_year) in by_country {
                let Some(by_year) = by_year.as_object() else {
                    continue;
                };
                let entity = self.ctx.countries.name(code).unwrap_or(code.as_str()).to_string();
                for (year, value) in by_year {
                    let in_range = year
                        .parse::<i32>()
                        .map(|y| params.year_in_range(y))
                        .unwrap_or(true);
                    if !in_range {
                        continue;
                    }
                    table.push_row(vec![
                        entity.clone(),
                        code.clone(),
                        year.clone(),
                        json_cell(Some(value)),
                    ]);
                }
            }
        }

        if table.is_empty() {
            return Err(DataSourceError::empty(
                SourceName::Imf,
                format!("no values for {}", indicator),
            )
            .into());
        }

        Ok(RawDataset::new(SourceName::Imf, table, vec![url], &[&body]))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::countries::CountryLookup;
    use crate::error::CuratorError;
    use crate::sources::MockTransport;

    fn adapter(mock: Arc<MockTransport>) -> ImfAdapter {
        ImfAdapter::new(AdapterContext::new(mock, Arc::new(CountryLookup::builtin())))
    }

    #[test]
    fn test_periods() {
        assert_eq!(periods(&FetchParams::new("x")), None);
        assert_eq!(
            periods(&FetchParams::new("x").with_years(Some(2020), Some(2022))).as_deref(),
            Some("2020,2021,2022")
        );
        assert_eq!(periods(&FetchParams::new("x").with_years(None, Some(1975))), None);
        assert_eq!(periods(&FetchParams::new("x").with_years(Some(3000), None)), None);
    }

    #[test]
    fn test_years_outside_series_skip_request() {
        let mock = Arc::new(MockTransport::new().respond("datamapper", r#"{"values":{}}"#));
        let imf = adapter(mock.clone());

        let err = imf
            .fetch(&FetchParams::new("NGDP_RPCH").with_years(None, Some(1975)))
            .unwrap_err();
        assert!(matches!(err, CuratorError::DataSource(DataSourceError::Empty { .. })));
        let err = imf
            .fetch(&FetchParams::new("NGDP_RPCH").with_years(Some(3000), None))
            .unwrap_err();
        assert!(matches!(err, CuratorError::DataSource(DataSourceError::Empty { .. })));
        assert_eq!(mock.calls(), 0);
    }

    #[test]
    fn test_fetch_flattens_nested_values() {
        let body = r#"{"values":{"NGDP_RPCH":{"ARG":{"2020":-9.9,"2021":10.7},"BRA":{"2020":-3.3}}},"api":{"version":"1"}}"#;
        let mock = Arc::new(MockTransport::new().respond("/NGDP_RPCH/ARG/BRA", body));
        let imf = adapter(mock.clone());
        let params = FetchParams::new("NGDP_RPCH")
            .with_countries(["Argentina", "BRA"])
            .with_years(Some(2020), Some(2021));

        let raw = imf.fetch(&params).unwrap();
        assert_eq!(raw.row_count(), 3);
        assert_eq!(raw.table.rows[0], vec!["Argentina", "ARG", "2020", "-9.9"]);
        assert!(mock.requested()[0].ends_with("?periods=2020%2C2021"));
    }

    #[test]
    fn test_empty_values() {
        let imf = adapter(Arc::new(MockTransport::new().respond("datamapper", r#"{"values":{}}"#)));
        let err = imf.fetch(&FetchParams::new("NGDP_RPCH")).unwrap_err();
        assert!(matches!(err, CuratorError::DataSource(DataSourceError::Empty { .. })));
    }

    #[test]
    fn test_not_json_is_malformed() {
        let imf = adapter(Arc::new(MockTransport::new().respond("datamapper", "<html>")));
        let err = imf.fetch(&FetchParams::new("NGDP_RPCH")).unwrap_err();
        assert!(matches!(err, CuratorError::DataSource(DataSourceError::Malformed { .. })));
    }
}
