//! Declarative configuration: general settings and the indicator registry.

mod registry;
mod settings;

pub use registry::{DEFAULT_INDICATORS_PATH, INDICATORS_ENV, IndicatorRegistry};
pub use settings::{
    CONFIG_ENV, DEFAULT_CONFIG_PATH, HttpSettings, PathSettings, SearchSettings, Settings,
};
