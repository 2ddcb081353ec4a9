use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use owo_colors::OwoColorize;
use whenext_core::CalendarCategory;
use whenext_core::WhenextError;
use whenext_core::config::WhenextConfig;
use whenext_core::dataset::DatasetLoader;
use whenext_core::feed::{FeedOptions, FeedVariant};

use crate::utils::tui::load_events;

pub struct FeedArgs {
    pub category: String,
    pub tags: Vec<String>,
    pub days: Option<i64>,
    pub timezone: Option<String>,
    pub full: bool,
    pub output: Option<PathBuf>,
}

impl FeedArgs {
    fn options(&self) -> Result<FeedOptions, WhenextError> {
        let timezone = match self.timezone.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) => Some(
                Tz::from_str(name).map_err(|_| WhenextError::InvalidTimezone(name.to_string()))?,
            ),
        };

        Ok(FeedOptions {
            tags: self
                .tags
                .iter()
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect(),
            days: self.days,
            timezone,
        })
    }
}

pub async fn run(config: &WhenextConfig, loader: &DatasetLoader, args: FeedArgs) -> Result<()> {
    let category = CalendarCategory::from_str(&args.category)?;
    let options = args.options()?;

    let mut builder = config.feed_builder()?;
    if args.full {
        builder = builder.with_variant(FeedVariant::Full);
    }

    let events = load_events(loader).await?;
    let ics = builder.build(&events, category.as_str(), &options)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &ics)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} {}",
                "Wrote".green(),
                path.display().to_string().bold()
            );
        }
        None => print!("{}", ics),
    }

    Ok(())
}
