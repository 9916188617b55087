//! World Bank Indicators API (v2) adapter.
//!
//! Required: `indicator` (e.g. `SI.POV.GINI`). Countries go into the path as
//! `;`-joined ISO-3 codes (`all` when none), years into `date=start:end`.
//! Responses are paged JSON `[meta, records]`; every page is fetched.

use chrono::{Datelike, Utc};
use serde_json::Value;

use crate::error::{DataSourceError, Result};
use crate::input::{CODE_COLUMN, DataTable, ENTITY_COLUMN, TIME_COLUMN, VALUE_COLUMN};
use crate::model::{FetchParams, SourceName};

use super::adapter::{AdapterContext, RawDataset, SourceAdapter};
use super::json::{json_cell, str_at};
use super::transport::{build_url, fetch_text};

const BASE_URL: &str = "https://api.worldbank.org/v2";

/// Records per page; the API caps at a few thousand.
const PER_PAGE: usize = 1000;

/// First year the API carries data for.
const FIRST_YEAR: i32 = 1960;

/// Safety valve against a misbehaving `pages` field.
const MAX_PAGES: u64 = 200;

pub struct WorldBankAdapter {
    ctx: AdapterContext,
}

impl WorldBankAdapter {
    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }

    fn page_url(&self, countries: &str, indicator: &str, date: Option<&str>, page: u64) -> Result<String> {
        let mut query = vec![
            ("format", "json".to_string()),
            ("per_page", PER_PAGE.to_string()),
            ("page", page.to_string()),
        ];
        if let Some(date) = date {
            query.push(("date", date.to_string()));
        }
        build_url(
            &format!("{}/country/{}/indicator/{}", BASE_URL, countries, indicator),
            &query,
        )
    }
}

/// `date=` filter for the requested range.
fn date_filter(params: &FetchParams) -> Option<String> {
    match (params.start_year, params.end_year) {
        (None, None) => None,
        (Some(s), Some(e)) => Some(format!("{}:{}", s, e)),
        (Some(s), None) => Some(format!("{}:{}", s, Utc::now().year())),
        (None, Some(e)) => Some(format!("{}:{}", FIRST_YEAR, e)),
    }
}

/// Parse one page into `(pages, records)`.
fn parse_page(body: &str) -> std::result::Result<(u64, Vec<Value>), String> {
    let json: Value = serde_json::from_str(body).map_err(|e| e.to_string())?;
    let parts = json.as_array().ok_or("expected a top-level array")?;

    let meta = parts.first().ok_or("missing page metadata")?;
    if let Some(messages) = meta.get("message").and_then(Value::as_array) {
        let text: Vec<String> = messages
            .iter()
            .map(|m| str_at(m, &["value"]).unwrap_or_default())
            .collect();
        return Err(format!("API message: {}", text.join("; ")));
    }

    let pages = meta.get("pages").and_then(Value::as_u64).unwrap_or(1);
    let records = match parts.get(1) {
        Some(Value::Array(records)) => records.clone(),
        Some(Value::Null) | None => Vec::new(),
        Some(_) => return Err("records are not an array".to_string()),
    };

    Ok((pages, records))
}

impl SourceAdapter for WorldBankAdapter {
    fn source(&self) -> SourceName {
        SourceName::WorldBank
    }

    fn fetch(&self, params: &FetchParams) -> Result<RawDataset> {
        let indicator = params.require_indicator(SourceName::WorldBank)?;
        params.validate_years()?;

        let codes = self.ctx.request_codes(SourceName::WorldBank, &params.countries);
        let countries = if codes.is_empty() {
            "all".to_string()
        } else {
            codes.join(";")
        };
        let date = date_filter(params);

        let mut table = DataTable::with_headers([
            ENTITY_COLUMN,
            CODE_COLUMN,
            TIME_COLUMN,
            "indicator",
            VALUE_COLUMN,
        ]);
        let mut urls = Vec::new();
        let mut bodies = Vec::new();

        let mut page = 1;
        loop {
            let url = self.page_url(&countries, indicator, date.as_deref(), page)?;
            let body = fetch_text(self.ctx.transport.as_ref(), SourceName::WorldBank, &url)?;
            let (pages, records) = parse_page(&body)
                .map_err(|cause| DataSourceError::malformed(SourceName::WorldBank, cause))?;

            for record in &records {
                let code = str_at(record, &["countryiso3code"])
                    .filter(|c| !c.is_empty())
                    .or_else(|| str_at(record, &["country", "id"]))
                    .unwrap_or_default();
                table.push_row(vec![
                    str_at(record, &["country", "value"]).unwrap_or_default(),
                    code,
                    str_at(record, &["date"]).unwrap_or_default(),
                    str_at(record, &["indicator", "id"]).unwrap_or_else(|| indicator.to_string()),
                    json_cell(record.get("value")),
                ]);
            }

            urls.push(url);
            bodies.push(body);

            if page >= pages.min(MAX_PAGES) {
                break;
            }
            page += 1;
        }

        if table.is_empty() {
            return Err(DataSourceError::empty(
                SourceName::WorldBank,
                format!("no observations for {} in {}", indicator, countries),
            )
            .into());
        }

        let payloads: Vec<&str> = bodies.iter().map(String::as_str).collect();
        Ok(RawDataset::new(SourceName::WorldBank, table, urls, &payloads))
    }
}
