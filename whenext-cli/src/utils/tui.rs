use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use whenext_core::Event;
use whenext_core::dataset::DatasetLoader;

pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["-", "\\", "|", "/"])
        .template("{msg} {spinner}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Load the dataset behind a spinner on stderr.
pub async fn load_events(loader: &DatasetLoader) -> Result<Vec<Event>> {
    let spinner = create_spinner("Loading events".to_string());
    let result = loader.load().await;
    spinner.finish_and_clear();

    Ok(result?)
}
