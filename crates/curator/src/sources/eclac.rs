//! ECLAC CEPALSTAT adapter.
//!
//! Required: `indicator` (numeric CEPALSTAT id). Two calls: the dimension
//! catalog (member id -> label) and the data records, whose `dim_{id}`
//! fields reference dimension members. The country and year dimensions are
//! found by name; every other dimension becomes a text column. The API has
//! no usable country/year query, so filtering is client-side.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{DataSourceError, Result};
use crate::input::{DataTable, ENTITY_COLUMN, TIME_COLUMN, VALUE_COLUMN};
use crate::model::{FetchParams, SourceName};

use super::adapter::{AdapterContext, RawDataset, SourceAdapter, filter_observations};
use super::json::{json_cell, str_at};
use super::transport::{build_url, fetch_text};

const BASE_URL: &str = "https://api-cepalstat.cepal.org/cepalstat/api/v1/indicator";

pub struct EclacAdapter {
    ctx: AdapterContext,
}

impl EclacAdapter {
    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

/// One dimension of an indicator, with its member labels.
#[derive(Debug)]
struct Dimension {
    id: String,
    name: String,
    members: HashMap<String, String>,
}

impl Dimension {
    fn is_country(&self) -> bool {
        let name = self.name.to_lowercase();
        name.contains("country") || name.contains("país") || name.contains("pais")
    }

    fn is_year(&self) -> bool {
        let name = self.name.to_lowercase();
        name.contains("year") || name.contains("año")
    }

    /// Column label without CEPALSTAT's `__ESTANDAR` suffix.
    fn column_name(&self) -> String {
        self.name
            .split("__")
            .next()
            .unwrap_or(&self.name)
            .trim()
            .to_string()
    }

    fn label(&self, record: &Value) -> String {
        let member = json_cell(record.get(format!("dim_{}", self.id)));
        self.members.get(&member).cloned().unwrap_or(member)
    }
}

fn body<'a>(json: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    json.get("body")
        .and_then(|b| b.get(key))
        .and_then(Value::as_array)
}

fn parse_dimensions(text: &str) -> std::result::Result<Vec<Dimension>, String> {
    let json: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    let dims = body(&json, "dimensions").ok_or("missing body.dimensions")?;

    Ok(dims
        .iter()
        .filter_map(|dim| {
            let id = str_at(dim, &["id"])?;
            let name = str_at(dim, &["name"]).unwrap_or_else(|| id.clone());
            let members = dim
                .get("members")
                .and_then(Value::as_array)
                .map(|members| {
                    members
                        .iter()
                        .filter_map(|m| Some((str_at(m, &["id"])?, str_at(m, &["name"])?)))
                        .collect()
                })
                .unwrap_or_default();
            Some(Dimension { id, name, members })
        })
        .collect())
}

impl SourceAdapter for EclacAdapter {
    fn source(&self) -> SourceName {
        SourceName::Eclac
    }

    fn fetch(&self, params: &FetchParams) -> Result<RawDataset> {
        let indicator = params.require_indicator(SourceName::Eclac)?;
        params.validate_years()?;
        let codes = self.ctx.request_codes(SourceName::Eclac, &params.countries);

        let query = [("lang", "en".to_string()), ("format", "json".to_string())];
        let dims_url = build_url(&format!("{}/{}/dimensions", BASE_URL, indicator), &query)?;
        let data_url = build_url(&format!("{}/{}/data", BASE_URL, indicator), &query)?;

        let transport = self.ctx.transport.as_ref();
        let dims_body = fetch_text(transport, SourceName::Eclac, &dims_url)?;
        let data_body = fetch_text(transport, SourceName::Eclac, &data_url)?;

        let dimensions = parse_dimensions(&dims_body)
            .map_err(|cause| DataSourceError::malformed(SourceName::Eclac, cause))?;
        let country = dimensions.iter().find(|d| d.is_country());
        let year = dimensions.iter().find(|d| d.is_year());
        let (Some(country), Some(year)) = (country, year) else {
            return Err(DataSourceError::malformed(
                SourceName::Eclac,
                format!("indicator {} has no country/year dimension", indicator),
            )
            .into());
        };
        let others: Vec<&Dimension> = dimensions
            .iter()
            .filter(|d| d.id != country.id && d.id != year.id)
            .collect();

        let data: Value = serde_json::from_str(&data_body)
            .map_err(|e| DataSourceError::malformed(SourceName::Eclac, e.to_string()))?;
        let records = body(&data, "data")
            .ok_or_else(|| DataSourceError::malformed(SourceName::Eclac, "missing body.data"))?;

        let mut headers = vec![ENTITY_COLUMN.to_string(), TIME_COLUMN.to_string()];
        headers.extend(others.iter().map(|d| d.column_name()));
        headers.push(VALUE_COLUMN.to_string());
        let mut table = DataTable::new(headers, Vec::new());

        for record in records {
            let mut row = vec![country.label(record), year.label(record)];
            row.extend(others.iter().map(|d| d.label(record)));
            row.push(json_cell(record.get("value")));
            table.push_row(row);
        }

        filter_observations(&mut table, params, &self.ctx.countries, &codes);

        if table.is_empty() {
            return Err(DataSourceError::empty(
                SourceName::Eclac,
                format!("no observations for indicator {}", indicator),
            )
            .into());
        }

        Ok(RawDataset::new(
            SourceName::Eclac,
            table,
            vec![dims_url, data_url],
            &[&dims_body, &data_body],
        ))
    }
}
