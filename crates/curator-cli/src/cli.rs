//! CLI argument definitions using clap.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Curator: fetch, clean and catalog economic indicators
#[derive(Parser)]
#[command(name = "curator")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format (pretty, compact, json)
    #[arg(long, default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    /// Settings file (default: config/settings.yaml when present)
    #[arg(long, env = "CURATOR_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Indicator registry file (default: config/indicators.yaml when present)
    #[arg(long, env = "CURATOR_INDICATORS", global = true)]
    pub indicators: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch an indicator from a provider, clean it and store it
    Fetch {
        /// Provider: owid, worldbank, oecd, imf, ilostat, eclac
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Provider indicator code
        #[arg(short, long)]
        indicator: Option<String>,

        /// Dataset identifier (OECD dataflow, IMF database)
        #[arg(short, long)]
        dataset: Option<String>,

        /// Countries by name or ISO-3 code, comma separated
        #[arg(short, long, value_delimiter = ',')]
        countries: Vec<String>,

        /// First year to keep
        #[arg(long)]
        start: Option<i32>,

        /// Last year to keep
        #[arg(long)]
        end: Option<i32>,

        /// Topic label (output directory and file prefix)
        #[arg(short, long)]
        topic: String,

        /// Geographic coverage label used in the file name
        #[arg(long, default_value = "global")]
        coverage: String,

        /// Output summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch a registry indicator by id
    FetchIndicator {
        /// Registry id (see `curator indicators`)
        #[arg(value_name = "ID")]
        id: String,

        /// Topic label (output directory and file prefix)
        #[arg(short, long)]
        topic: String,

        /// Geographic coverage label used in the file name
        #[arg(long, default_value = "global")]
        coverage: String,

        /// Countries by name or ISO-3 code, comma separated
        #[arg(short, long, value_delimiter = ',')]
        countries: Vec<String>,

        /// First year to keep
        #[arg(long)]
        start: Option<i32>,

        /// Last year to keep
        #[arg(long)]
        end: Option<i32>,

        /// Output summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clean a stored raw file without fetching
    Clean {
        /// Path to the raw CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Provider the file came from
        #[arg(short, long)]
        source: String,

        /// Topic label (output directory and file prefix)
        #[arg(short, long)]
        topic: String,

        /// Geographic coverage label used in the file name
        #[arg(long, default_value = "global")]
        coverage: String,

        /// First year to keep
        #[arg(long)]
        start: Option<i32>,

        /// Last year to keep
        #[arg(long)]
        end: Option<i32>,

        /// Output summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search the indicator registry and provider catalogs
    Search {
        /// Free-text query
        #[arg(value_name = "QUERY")]
        query: String,

        /// Only search the local registry
        #[arg(long)]
        local_only: bool,

        /// Restrict results to one provider
        #[arg(short, long)]
        source: Option<String>,

        /// Restrict registry results to a tag
        #[arg(long)]
        tag: Option<String>,

        /// Maximum registry hits
        #[arg(long, default_value = "20")]
        max_local: usize,

        /// Maximum hits per provider catalog
        #[arg(long, default_value = "10")]
        max_remote: usize,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List registry indicators
    Indicators {
        /// Only indicators of this provider
        #[arg(short, long)]
        source: Option<String>,

        /// Only indicators with this tag
        #[arg(long)]
        tag: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
