//! Colored terminal rendering for events.

use chrono::{DateTime, Duration, Local, Utc};
use owo_colors::OwoColorize;
use whenext_core::Event;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self, now: DateTime<Utc>) -> String;
}

impl Render for Event {
    fn render(&self, now: DateTime<Utc>) -> String {
        let when = match self.start() {
            Some(start) => start
                .with_timezone(&Local)
                .format("%a %b %-d %Y %H:%M")
                .to_string(),
            None => self.event_date_iso.clone(),
        };

        let countdown = match self.start() {
            Some(start) if start > now => format_countdown(start - now).green().to_string(),
            Some(start) => format!("{} ago", format_countdown(now - start))
                .dimmed()
                .to_string(),
            None => "unknown date".red().to_string(),
        };

        let tags = format!("[{}]", self.categories().join(", "));

        format!(
            "{} {} {}\n    {} {}",
            self.title.bold(),
            tags.dimmed(),
            self.icon.as_deref().unwrap_or_default(),
            when,
            countdown
        )
        .trim_end()
        .to_string()
    }
}

/// Human countdown like "12days 3h 5m", minutes precision.
pub fn format_countdown(remaining: Duration) -> String {
    let minutes = remaining.num_minutes().max(0) as u64;
    if minutes == 0 {
        return "now".to_string();
    }

    humantime::format_duration(std::time::Duration::from_secs(minutes * 60)).to_string()
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
