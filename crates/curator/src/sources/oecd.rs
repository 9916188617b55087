//! OECD SDMX REST adapter.
//!
//! Required: `dataset` (dataflow id, e.g. `OECD.SDD.NAD,DSD_NAMAIN1@DF_QNA,1.0`)
//! and `indicator` (the SDMX dimension key). A `{countries}` placeholder in
//! the key is replaced with `+`-joined ISO-3 codes (empty = wildcard); keys
//! without the placeholder are filtered client-side instead.

use crate::error::{DataSourceError, Result};
use crate::input::{CODE_COLUMN, ENTITY_COLUMN, Parser, TIME_COLUMN, VALUE_COLUMN};
use crate::model::{FetchParams, SourceName};

use super::adapter::{AdapterContext, RawDataset, SourceAdapter, filter_observations};
use super::transport::{build_url, fetch_text};

const BASE_URL: &str = "https://sdmx.oecd.org/public/rest/data";

/// Placeholder for the reference-area dimension in registry keys.
pub const COUNTRIES_PLACEHOLDER: &str = "{countries}";

pub struct OecdAdapter {
    ctx: AdapterContext,
}

impl OecdAdapter {
    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

/// Substitute the country placeholder. Returns the key and whether it was used.
fn expand_key(key: &str, codes: &[String]) -> (String, bool) {
    if key.contains(COUNTRIES_PLACEHOLDER) {
        (key.replace(COUNTRIES_PLACEHOLDER, &codes.join("+")), true)
    } else {
        (key.to_string(), false)
    }
}

impl SourceAdapter for OecdAdapter {
    fn source(&self) -> SourceName {
        SourceName::Oecd
    }

    fn fetch(&self, params: &FetchParams) -> Result<RawDataset> {
        let dataset = params.require_dataset(SourceName::Oecd)?;
        let key = params.require_indicator(SourceName::Oecd)?;
        params.validate_years()?;

        let codes = self.ctx.request_codes(SourceName::Oecd, &params.countries);
        let (key, server_filtered) = expand_key(key, &codes);

        let mut query = vec![
            ("dimensionAtObservation", "AllDimensions".to_string()),
            ("format", "csvfilewithlabels".to_string()),
        ];
        if let Some(start) = params.start_year {
            query.push(("startPeriod", start.to_string()));
        }
        if let Some(end) = params.end_year {
            query.push(("endPeriod", end.to_string()));
        }
        let url = build_url(&format!("{}/{}/{}", BASE_URL, dataset, key), &query)?;

        let body = fetch_text(self.ctx.transport.as_ref(), SourceName::Oecd, &url)?;
        if body.trim().eq_ignore_ascii_case("NoRecordsFound") || body.trim().eq_ignore_ascii_case("No results found.") {
            return Err(DataSourceError::empty(SourceName::Oecd, format!("no records for {}/{}", dataset, key)).into());
        }

        let mut table = Parser::new()
            .parse_bytes(body.as_bytes())
            .map_err(|e| DataSourceError::malformed(SourceName::Oecd, e.to_string()))?;

        table.rename_column(&["REF_AREA", "LOCATION", "COU"], CODE_COLUMN);
        table.rename_column(&["Reference area", "Country"], ENTITY_COLUMN);
        table.rename_column(&["TIME_PERIOD", "TIME", "Time"], TIME_COLUMN);
        table.rename_column(&["OBS_VALUE", "Value"], VALUE_COLUMN);

        if table.column_index(TIME_COLUMN).is_none() || table.column_index(VALUE_COLUMN).is_none() {
            return Err(DataSourceError::malformed(
                SourceName::Oecd,
                format!("expected TIME_PERIOD/OBS_VALUE columns, got {:?}", table.headers),
            )
            .into());
        }

        let client_codes = if server_filtered { Vec::new() } else { codes };
        filter_observations(&mut table, params, &self.ctx.countries, &client_codes);

        if table.is_empty() {
            return Err(DataSourceError::empty(
                SourceName::Oecd,
                format!("no observations for {}/{}", dataset, key),
            )
            .into());
        }

        Ok(RawDataset::new(SourceName::Oecd, table, vec![url], &[&body]))
    }
}
