//! Clean command - standardize a stored raw file.

use std::path::PathBuf;

use curator::SourceName;

use super::{ConfigFiles, build_curator, print_summary};

#[allow(clippy::too_many_arguments)]
pub fn run(
    files: &ConfigFiles,
    file: PathBuf,
    source: &str,
    topic: &str,
    coverage: &str,
    start: Option<i32>,
    end: Option<i32>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("Raw file not found: {}", file.display()).into());
    }

    let source: SourceName = source.parse()?;
    let curator = build_curator(files)?;
    let summary = curator.clean_file(&file, source, topic, coverage, start, end)?;
    print_summary(&summary, json_output)
}
