//! Search command - hybrid catalog and provider search.

use colored::Colorize;
use curator::{SearchHit, SearchOptions, SourceName};

use super::{ConfigFiles, build_curator};

#[allow(clippy::too_many_arguments)]
pub fn run(
    files: &ConfigFiles,
    query: &str,
    local_only: bool,
    source: Option<String>,
    tag: Option<String>,
    max_local: usize,
    max_remote: usize,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let curator = build_curator(files)?;

    let mut options = SearchOptions {
        include_remote: !local_only,
        max_local,
        max_remote,
        ..SearchOptions::default()
    };
    if let Some(source) = source {
        options = options.with_source(source.parse::<SourceName>()?);
    }
    if let Some(tag) = tag {
        options = options.with_tag(tag);
    }

    let results = curator.search_engine().search(query, &options);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!(
        "{} {} for {}",
        results.total.to_string().white().bold(),
        "results".cyan().bold(),
        format!("\"{}\"", results.query).white()
    );
    println!();

    if !results.local.is_empty() {
        println!("{}", "Registry:".yellow().bold());
        for hit in &results.local {
            print_hit(hit);
        }
        println!();
    }

    if !results.remote.is_empty() {
        println!("{}", "Provider catalogs:".yellow().bold());
        for hit in &results.remote {
            print_hit(hit);
        }
        println!();
    }

    for (provider, status) in results.status.iter().filter(|(_, s)| s.as_str() != "ok") {
        println!("  {} {}: {}", "!".red().bold(), provider, status);
    }
    Ok(())
}

fn print_hit(hit: &SearchHit) {
    let marker = if hit.downloaded {
        "●".green()
    } else {
        "○".dimmed()
    };
    println!(
        "  {} {} {} {}",
        marker,
        hit.id.white().bold(),
        format!("[{}]", hit.source).dimmed(),
        hit.name
    );
}
