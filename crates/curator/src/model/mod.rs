//! Core domain types: providers, indicator descriptors, fetch parameters.

mod indicator;
mod request;
mod source;

pub use indicator::{IndicatorDescriptor, LookupKey};
pub use request::FetchParams;
pub use source::SourceName;
