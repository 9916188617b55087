//! Curator CLI - economic indicator curation.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use logging::{LogConfig, init_logging};

fn main() {
    let cli = Cli::parse();

    init_logging(&LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format));

    let files = commands::ConfigFiles {
        settings: cli.config,
        indicators: cli.indicators,
    };

    let result = match cli.command {
        Commands::Fetch {
            source,
            indicator,
            dataset,
            countries,
            start,
            end,
            topic,
            coverage,
            json,
        } => commands::fetch::run(
            &files,
            commands::fetch::FetchArgs {
                source,
                indicator,
                dataset,
                countries,
                start,
                end,
                topic,
                coverage,
            },
            json,
        ),

        Commands::FetchIndicator {
            id,
            topic,
            coverage,
            countries,
            start,
            end,
            json,
        } => commands::fetch_indicator::run(&files, &id, &topic, &coverage, countries, start, end, json),

        Commands::Clean {
            file,
            source,
            topic,
            coverage,
            start,
            end,
            json,
        } => commands::clean::run(&files, file, &source, &topic, &coverage, start, end, json),

        Commands::Search {
            query,
            local_only,
            source,
            tag,
            max_local,
            max_remote,
            json,
        } => commands::search::run(
            &files, &query, local_only, source, tag, max_local, max_remote, json,
        ),

        Commands::Indicators { source, tag, json } => commands::indicators::run(&files, source, tag, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
