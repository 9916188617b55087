//! Fetch-indicator command - run the pipeline for a registry entry.

use super::{ConfigFiles, build_curator, print_summary};

#[allow(clippy::too_many_arguments)]
pub fn run(
    files: &ConfigFiles,
    id: &str,
    topic: &str,
    coverage: &str,
    countries: Vec<String>,
    start: Option<i32>,
    end: Option<i32>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let curator = build_curator(files)?;
    let summary = curator.run_indicator(id, topic, coverage, countries, start, end)?;
    print_summary(&summary, json_output)
}
