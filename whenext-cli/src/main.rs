mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use whenext_core::config::WhenextConfig;
use whenext_core::dataset::{DatasetLoader, DatasetSource};
use whenext_core::filter::{FilterState, SortDirection, SortKey};
use whenext_core::logging::init_tracing;

#[derive(Parser)]
#[command(name = "whenext")]
#[command(about = "Countdowns to upcoming events and calendar feeds to subscribe to them")]
struct Cli {
    /// Read events from this file or URL instead of the configured sources
    #[arg(long, global = true)]
    dataset: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List events with their countdowns
    Events {
        /// Only show this category (e.g. "tech")
        #[arg(short, long, default_value = "all")]
        category: String,

        #[arg(short, long, value_enum, default_value_t = SortArg::Date)]
        sort: SortArg,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Include events that already happened
        #[arg(long)]
        passed: bool,

        /// Only show events that already happened
        #[arg(long, conflicts_with = "passed")]
        history: bool,

        /// Print the events as JSON
        #[arg(long)]
        json: bool,
    },
    /// List feed categories with their event counts
    Categories,
    /// Write the iCalendar feed for a category
    Feed {
        /// Feed category (e.g. "tech", "alle")
        category: String,

        /// Only events with one of these tags (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Only events within this many days
        #[arg(long)]
        days: Option<i64>,

        /// Timezone hint for the feed (e.g. "America/New_York")
        #[arg(long)]
        timezone: Option<String>,

        /// Emit every matching event instead of the configured limit
        #[arg(long)]
        full: bool,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print subscription links
    Links {
        /// Only this category (all feed categories if omitted)
        category: Option<String>,

        /// Only events with one of these tags (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Only events within this many days
        #[arg(long)]
        days: Option<i64>,

        /// Timezone hint for the feed
        #[arg(long)]
        timezone: Option<String>,
    },
    /// Show configuration paths and settings
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Date,
    Category,
    Name,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Date => SortKey::Date,
            SortArg::Category => SortKey::Category,
            SortArg::Name => SortKey::Name,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("warn");

    let cli = Cli::parse();
    let config = WhenextConfig::load().context("Failed to load configuration")?;
    let loader = dataset_loader(&config, cli.dataset.as_deref());

    match cli.command {
        Commands::Events {
            category,
            sort,
            desc,
            passed,
            history,
            json,
        } => {
            let state = FilterState {
                category,
                sort_by: sort.into(),
                direction: if desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                },
                show_passed_events: passed,
                history,
            };
            commands::events::run(&loader, &state, json).await
        }
        Commands::Categories => commands::categories::run(&loader).await,
        Commands::Feed {
            category,
            tags,
            days,
            timezone,
            full,
            output,
        } => {
            let args = commands::feed::FeedArgs {
                category,
                tags,
                days,
                timezone,
                full,
                output,
            };
            commands::feed::run(&config, &loader, args).await
        }
        Commands::Links {
            category,
            tags,
            days,
            timezone,
        } => commands::links::run(&config, category.as_deref(), tags, days, timezone),
        Commands::Config => commands::config::run(&config, &loader),
    }
}

/// `--dataset` replaces the configured source chain.
fn dataset_loader(config: &WhenextConfig, dataset: Option<&str>) -> DatasetLoader {
    match dataset {
        Some(source) if source.starts_with("http://") || source.starts_with("https://") => {
            DatasetLoader::new(vec![DatasetSource::Url(source.to_string())])
        }
        Some(path) => DatasetLoader::new(vec![DatasetSource::file(path)]),
        None => config.dataset_loader(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_dataset_flag_overrides_sources() {
        let config = WhenextConfig::default();

        let loader = dataset_loader(&config, Some("https://example.com/events.json"));
        assert_eq!(
            loader.sources(),
            &[DatasetSource::Url("https://example.com/events.json".to_string())]
        );

        let loader = dataset_loader(&config, Some("/tmp/events.json"));
        assert_eq!(
            loader.sources(),
            &[DatasetSource::File(PathBuf::from("/tmp/events.json"))]
        );

        let loader = dataset_loader(&config, None);
        assert_eq!(loader.sources(), config.dataset_sources().as_slice());
    }

    #[test]
    fn test_feed_tags_are_comma_separated() {
        let cli = Cli::parse_from(["whenext", "feed", "tech", "--tags", "launch,apple", "--full"]);

        match cli.command {
            Commands::Feed {
                category,
                tags,
                full,
                ..
            } => {
                assert_eq!(category, "tech");
                assert_eq!(tags, vec!["launch", "apple"]);
                assert!(full);
            }
            _ => panic!("expected feed command"),
        }
    }
}
