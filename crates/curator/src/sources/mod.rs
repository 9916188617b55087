//! Source adapters: one per statistical provider.
//!
//! Every adapter implements [`SourceAdapter`] over a shared [`Transport`]
//! and [`CountryLookup`](crate::countries::CountryLookup). [`build_adapter`]
//! is the compile-time registry; user strings are parsed into
//! [`SourceName`] before they get here.

mod adapter;
mod eclac;
mod ilostat;
mod imf;
mod json;
mod mock;
mod oecd;
mod owid;
mod transport;
mod worldbank;

pub use adapter::{AdapterContext, RawDataset, SourceAdapter, filter_observations};
pub use eclac::EclacAdapter;
pub use ilostat::IlostatAdapter;
pub use imf::ImfAdapter;
pub use mock::MockTransport;
pub use oecd::{COUNTRIES_PLACEHOLDER, OecdAdapter};
pub use owid::OwidAdapter;
pub use transport::{
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, HttpResponse, ReqwestTransport, Transport,
    build_url, fetch_text,
};
pub use worldbank::WorldBankAdapter;

pub(crate) use json::{json_cell, str_at};

use crate::model::SourceName;

/// Construct the adapter for `source`.
pub fn build_adapter(source: SourceName, ctx: AdapterContext) -> Box<dyn SourceAdapter> {
    match source {
        SourceName::Owid => Box::new(OwidAdapter::new(ctx)),
        SourceName::WorldBank => Box::new(WorldBankAdapter::new(ctx)),
        SourceName::Oecd => Box::new(OecdAdapter::new(ctx)),
        SourceName::Imf => Box::new(ImfAdapter::new(ctx)),
        SourceName::Ilostat => Box::new(IlostatAdapter::new(ctx)),
        SourceName::Eclac => Box::new(EclacAdapter::new(ctx)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::countries::CountryLookup;

    #[test]
    fn test_every_source_has_an_adapter() {
        let ctx = AdapterContext::new(Arc::new(MockTransport::new()), Arc::new(CountryLookup::builtin()));
        for source in SourceName::ALL {
            let adapter = build_adapter(source, ctx.clone());
            assert_eq!(adapter.source(), source);
        }
    }
}
