//! Our World in Data grapher adapter.
//!
//! Required: `indicator` (chart slug). Countries and years are filtered
//! client-side because the grapher CSV export always returns every entity.

use crate::error::{DataSourceError, Result};
use crate::input::{CODE_COLUMN, ENTITY_COLUMN, Parser, TIME_COLUMN};
use crate::model::{FetchParams, SourceName};

use super::adapter::{AdapterContext, RawDataset, SourceAdapter, filter_observations};
use super::transport::{build_url, fetch_text};

/// Grapher chart base URL.
const BASE_URL: &str = "https://ourworldindata.org/grapher";

pub struct OwidAdapter {
    ctx: AdapterContext,
    base_url: String,
}

impl OwidAdapter {
    pub fn new(ctx: AdapterContext) -> Self {
        Self {
            ctx,
            base_url: BASE_URL.to_string(),
        }
    }

    fn chart_url(&self, slug: &str) -> Result<String> {
        build_url(
            &format!("{}/{}.csv", self.base_url, slug),
            &[
                ("v", "1".to_string()),
                ("csvType", "full".to_string()),
                ("useColumnShortNames", "true".to_string()),
            ],
        )
    }
}

impl SourceAdapter for OwidAdapter {
    fn source(&self) -> SourceName {
        SourceName::Owid
    }

    fn fetch(&self, params: &FetchParams) -> Result<RawDataset> {
        let slug = params.require_indicator(SourceName::Owid)?;
        params.validate_years()?;

        let url = self.chart_url(slug)?;
        let body = fetch_text(self.ctx.transport.as_ref(), SourceName::Owid, &url)?;

        let mut table = Parser::new()
            .parse_bytes(body.as_bytes())
            .map_err(|e| DataSourceError::malformed(SourceName::Owid, e.to_string()))?;

        table.rename_column(&["Entity", "country"], ENTITY_COLUMN);
        table.rename_column(&["Code"], CODE_COLUMN);
        table.rename_column(&["Year", "Day", "date"], TIME_COLUMN);

        if table.column_index(ENTITY_COLUMN).is_none() || table.column_index(TIME_COLUMN).is_none() {
            return Err(DataSourceError::malformed(
                SourceName::Owid,
                format!("chart '{}' has no Entity/Year columns (got {:?})", slug, table.headers),
            )
            .into());
        }

        let wanted = self.ctx.request_codes(SourceName::Owid, &params.countries);
        filter_observations(&mut table, params, &self.ctx.countries, &wanted);

        if table.is_empty() {
            return Err(DataSourceError::empty(
                SourceName::Owid,
                format!("chart '{}' has no rows for the requested filter", slug),
            )
            .into());
        }

        Ok(RawDataset::new(SourceName::Owid, table, vec![url], &[&body]))
    }
}
