use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use whenext_core::dataset::DatasetLoader;
use whenext_core::filter::{self, FilterState};

use crate::render::{Render, pluralize};
use crate::utils::tui::load_events;

pub async fn run(loader: &DatasetLoader, state: &FilterState, json: bool) -> Result<()> {
    let events = load_events(loader).await?;
    let now = Utc::now();
    let selected = filter::filtered_events(&events, state, now);

    if json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
        return Ok(());
    }

    if selected.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    for event in &selected {
        println!("{}", event.render(now));
    }

    println!();
    println!(
        "{}",
        format!("{} {}", selected.len(), pluralize("event", selected.len())).dimmed()
    );

    Ok(())
}
