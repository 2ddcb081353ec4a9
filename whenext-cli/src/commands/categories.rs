use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use whenext_core::category::{self, CalendarCategory};
use whenext_core::dataset::DatasetLoader;
use whenext_core::filter::{self, FilterState};

use crate::utils::tui::load_events;

pub async fn run(loader: &DatasetLoader) -> Result<()> {
    let events = load_events(loader).await?;
    let counts = filter::category_counts(&events, &FilterState::default(), Utc::now());

    println!("{}", "Feed categories".bold());
    for category in CalendarCategory::all() {
        // "alle" counts everything
        let key = if category::is_all(category.as_str()) {
            category::ALL
        } else {
            category.as_str()
        };
        let count = counts.get(key).copied().unwrap_or(0);

        println!(
            "  {:<14} {:<22} {}",
            category.as_str(),
            category.display_name(),
            count.to_string().dimmed()
        );
    }

    let others: Vec<_> = counts
        .iter()
        .filter(|(name, _)| {
            name.as_str() != category::ALL && !category::is_valid_category(name)
        })
        .collect();

    if !others.is_empty() {
        println!();
        println!("{}", "Other tags".bold());
        for (name, count) in others {
            println!("  {:<14} {}", name, count.to_string().dimmed());
        }
    }

    Ok(())
}
