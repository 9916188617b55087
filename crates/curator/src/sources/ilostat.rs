//! ILOSTAT adapter (rplumber data API, CSV).
//!
//! Required: `indicator` (e.g. `UNE_DEAP_SEX_AGE_RT_A`). Countries go into
//! `ref_area` joined with `+`, years into `timefrom`/`timeto`.

use crate::error::{DataSourceError, Result};
use crate::input::{CODE_COLUMN, ENTITY_COLUMN, Parser, TIME_COLUMN, VALUE_COLUMN};
use crate::model::{FetchParams, SourceName};

use super::adapter::{AdapterContext, RawDataset, SourceAdapter};
use super::transport::{build_url, fetch_text};

const BASE_URL: &str = "https://rplumber.ilo.org/data/indicator/";

pub struct IlostatAdapter {
    ctx: AdapterContext,
}

impl IlostatAdapter {
    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

impl SourceAdapter for IlostatAdapter {
    fn source(&self) -> SourceName {
        SourceName::Ilostat
    }

    fn fetch(&self, params: &FetchParams) -> Result<RawDataset> {
        let indicator = params.require_indicator(SourceName::Ilostat)?;
        params.validate_years()?;

        let codes = self.ctx.request_codes(SourceName::Ilostat, &params.countries);

        let mut query = vec![
            ("id", indicator.to_string()),
            ("type", "code".to_string()),
            ("format", ".csv".to_string()),
        ];
        if !codes.is_empty() {
            query.push(("ref_area", codes.join("+")));
        }
        if let Some(start) = params.start_year {
            query.push(("timefrom", start.to_string()));
        }
        if let Some(end) = params.end_year {
            query.push(("timeto", end.to_string()));
        }
        let url = build_url(BASE_URL, &query)?;
        let body = fetch_text(self.ctx.transport.as_ref(), SourceName::Ilostat, &url)?;

        let mut table = Parser::new()
            .parse_bytes(body.as_bytes())
            .map_err(|e| DataSourceError::malformed(SourceName::Ilostat, e.to_string()))?;

        table.rename_column(&["ref_area"], CODE_COLUMN);
        table.rename_column(&["ref_area.label"], ENTITY_COLUMN);
        table.rename_column(&["time"], TIME_COLUMN);
        table.rename_column(&["obs_value"], VALUE_COLUMN);

        if table.column_index(CODE_COLUMN).is_none()
            || table.column_index(TIME_COLUMN).is_none()
            || table.column_index(VALUE_COLUMN).is_none()
        {
            return Err(DataSourceError::malformed(
                SourceName::Ilostat,
                format!("expected ref_area/time/obs_value columns, got {:?}", table.headers),
            )
            .into());
        }

        if table.is_empty() {
            return Err(DataSourceError::empty(
                SourceName::Ilostat,
                format!("no observations for {}", indicator),
            )
            .into());
        }

        Ok(RawDataset::new(SourceName::Ilostat, table, vec![url], &[&body]))
    }
}
