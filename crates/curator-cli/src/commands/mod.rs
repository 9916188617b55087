//! Command implementations.

pub mod clean;
pub mod fetch;
pub mod fetch_indicator;
pub mod indicators;
pub mod search;

use std::path::{Path, PathBuf};

use colored::Colorize;
use curator::config::{DEFAULT_CONFIG_PATH, DEFAULT_INDICATORS_PATH};
use curator::{Curator, IndicatorRegistry, PipelineSummary, Settings};

/// Configuration file overrides from the command line or environment.
pub struct ConfigFiles {
    pub settings: Option<PathBuf>,
    pub indicators: Option<PathBuf>,
}

/// Explicit path first, then the default path when it exists, else `None`.
fn resolve(explicit: Option<&Path>, default: &str) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let path = PathBuf::from(default);
            path.exists().then_some(path)
        }
    }
}

pub fn load_settings(files: &ConfigFiles) -> Result<Settings, Box<dyn std::error::Error>> {
    match resolve(files.settings.as_deref(), DEFAULT_CONFIG_PATH) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading settings");
            Ok(Settings::load(&path)?)
        }
        None => Ok(Settings::default()),
    }
}

pub fn load_registry(files: &ConfigFiles) -> Result<IndicatorRegistry, Box<dyn std::error::Error>> {
    match resolve(files.indicators.as_deref(), DEFAULT_INDICATORS_PATH) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading indicator registry");
            Ok(IndicatorRegistry::load(&path)?)
        }
        None => Ok(IndicatorRegistry::default()),
    }
}

pub fn build_curator(files: &ConfigFiles) -> Result<Curator, Box<dyn std::error::Error>> {
    let settings = load_settings(files)?;
    let registry = load_registry(files)?;
    Ok(Curator::from_settings(settings, registry)?)
}

/// Print a pipeline summary as JSON or for humans.
pub fn print_summary(summary: &PipelineSummary, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!(
        "{} {} ({})",
        "Stored".green().bold(),
        summary.canonical_path.display().to_string().white(),
        summary.source.label()
    );
    println!();
    println!("  Rows:      {}", summary.rows.to_string().white().bold());
    println!("  Columns:   {}", summary.column_names.join(", "));
    println!(
        "  Period:    {} to {}",
        summary.year_range.0, summary.year_range.1
    );
    println!(
        "  Countries: {} resolved",
        summary.resolved_countries.to_string().cyan()
    );
    if !summary.unresolved_values.is_empty() {
        println!(
            "  {} {}",
            "Unresolved:".yellow(),
            summary.unresolved_values.join(", ")
        );
    }
    println!("  Raw file:  {}", summary.raw_path.display());
    if let Some(path) = &summary.metadata_path {
        println!("  Metadata:  {}", path.display());
    }
    Ok(())
}
