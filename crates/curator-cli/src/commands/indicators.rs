//! Indicators command - list the registry.

use colored::Colorize;
use curator::{IndicatorDescriptor, SourceName};

use super::{ConfigFiles, load_registry};

pub fn run(
    files: &ConfigFiles,
    source: Option<String>,
    tag: Option<String>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = load_registry(files)?;
    let source: Option<SourceName> = source.map(|s| s.parse()).transpose()?;

    let selected: Vec<&IndicatorDescriptor> = registry
        .iter()
        .filter(|d| source.is_none_or(|s| d.source == s))
        .filter(|d| tag.as_deref().is_none_or(|t| d.has_tag(t)))
        .collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&selected)?);
        return Ok(());
    }

    if selected.is_empty() {
        println!("{}", "No indicators match.".yellow());
        return Ok(());
    }

    println!(
        "{} {}",
        selected.len().to_string().white().bold(),
        "indicators".cyan().bold()
    );
    println!();
    for d in selected {
        println!(
            "  {} {} {}",
            d.id.white().bold(),
            format!("[{}]", d.source).dimmed(),
            d.name
        );
        if !d.tags.is_empty() {
            println!("      {}", d.tags.join(", ").dimmed());
        }
    }
    Ok(())
}
