//! Supported statistical providers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CuratorError;

/// A statistical data provider with an adapter in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceName {
    /// Our World in Data grapher charts.
    Owid,
    /// World Bank Indicators API (v2).
    #[serde(alias = "world_bank", alias = "wb")]
    WorldBank,
    /// OECD SDMX REST API.
    Oecd,
    /// IMF DataMapper API.
    Imf,
    /// ILOSTAT bulk/rplumber API.
    #[serde(alias = "ilo")]
    Ilostat,
    /// ECLAC CEPALSTAT API.
    #[serde(alias = "cepal", alias = "cepalstat")]
    Eclac,
}

impl SourceName {
    /// Every provider, in registry order.
    pub const ALL: [SourceName; 6] = [
        SourceName::Owid,
        SourceName::WorldBank,
        SourceName::Oecd,
        SourceName::Imf,
        SourceName::Ilostat,
        SourceName::Eclac,
    ];

    /// Short identifier used in file names and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceName::Owid => "owid",
            SourceName::WorldBank => "worldbank",
            SourceName::Oecd => "oecd",
            SourceName::Imf => "imf",
            SourceName::Ilostat => "ilostat",
            SourceName::Eclac => "eclac",
        }
    }

    /// Human-readable provider name.
    pub fn label(&self) -> &'static str {
        match self {
            SourceName::Owid => "Our World in Data",
            SourceName::WorldBank => "World Bank",
            SourceName::Oecd => "OECD",
            SourceName::Imf => "International Monetary Fund",
            SourceName::Ilostat => "ILOSTAT",
            SourceName::Eclac => "ECLAC (CEPALSTAT)",
        }
    }
}

impl FromStr for SourceName {
    type Err = CuratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "owid" | "ourworldindata" => Ok(SourceName::Owid),
            "worldbank" | "world_bank" | "wb" => Ok(SourceName::WorldBank),
            "oecd" => Ok(SourceName::Oecd),
            "imf" => Ok(SourceName::Imf),
            "ilostat" | "ilo" => Ok(SourceName::Ilostat),
            "eclac" | "cepal" | "cepalstat" => Ok(SourceName::Eclac),
            _ => Err(CuratorError::UnknownSource(s.to_string())),
        }
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
