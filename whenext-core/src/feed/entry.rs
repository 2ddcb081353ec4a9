//! Calendar entries derived from events.

use chrono::{DateTime, Duration, Utc};
use url::Url;

use super::location::extract_location;
use crate::event::Event;

/// Events carry no duration, so every entry lasts this long.
const DEFAULT_DURATION_HOURS: i64 = 2;

pub const DEFAULT_ORGANIZER: &str = "Whenext";
pub const ORGANIZER_EMAIL: &str = "noreply@whenext.app";

/// A reminder shown some time before the entry starts.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedAlarm {
    pub before: Duration,
    pub description: String,
}

/// One VEVENT of a feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub uid: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: String,
    pub description: String,
    pub categories: Vec<String>,
    pub location: Option<String>,
    pub url: String,
    /// Common name of the organizer
    pub organizer: String,
    pub alarms: Vec<FeedAlarm>,
    /// X- properties, in output order
    pub custom_properties: Vec<(String, String)>,
}

impl FeedEntry {
    pub fn from_event(
        event: &Event,
        start: DateTime<Utc>,
        base_url: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let uid = event.uid();
        let url = event
            .source_url
            .as_deref()
            .and_then(web_url)
            .unwrap_or_else(|| format!("{}/event/{}", base_url, uid));

        let mut custom_properties = Vec::new();
        if let Some(confidence) = event.confidence {
            custom_properties.push(("X-WHENEXT-CONFIDENCE".to_string(), confidence.to_string()));
        }
        if let Some(ref source) = event.source {
            custom_properties.push(("X-WHENEXT-SOURCE".to_string(), source.clone()));
        }

        FeedEntry {
            uid,
            start,
            end: start + Duration::hours(DEFAULT_DURATION_HOURS),
            summary: event.title.clone(),
            description: build_description(event, base_url),
            categories: event.categories(),
            location: event
                .location
                .clone()
                .filter(|l| !l.trim().is_empty())
                .or_else(|| extract_location(event)),
            url,
            organizer: event
                .source
                .clone()
                .unwrap_or_else(|| DEFAULT_ORGANIZER.to_string()),
            alarms: reminders(&event.title, start, now),
            custom_properties,
        }
    }
}

/// `value` if it is a usable http(s) link.
///
/// The url crate silently drops tabs and newlines while parsing, so control
/// characters are rejected before it sees the value.
fn web_url(value: &str) -> Option<String> {
    if value.chars().any(char::is_control) {
        return None;
    }

    let url = Url::parse(value.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

/// Description text: the event's own text followed by notes, confidence,
/// source and the attribution footer, separated by blank lines.
fn build_description(event: &Event, base_url: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(ref description) = event.description {
        parts.push(description.clone());
    }
    if let Some(ref notes) = event.notes {
        parts.push(format!("Notes: {}", notes));
    }
    if let Some(confidence) = event.confidence {
        parts.push(format!("Confidence: {}%", (confidence * 100.0).round() as i64));
    }
    if let Some(ref source) = event.source {
        parts.push(format!("Source: {}", source));
    }
    if let Some(ref source_url) = event.source_url {
        parts.push(format!("More info: {}", source_url));
    }
    parts.push(format!("📅 Tracked by Whenext - {}", base_url));

    parts.join("\n\n")
}

/// Whole days until `start`, rounded up.
fn days_until(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (start - now).num_milliseconds();
    let day = Duration::days(1).num_milliseconds();
    -(-millis).div_euclid(day)
}

/// Reminders a week, a day and an hour ahead, depending on how far away the
/// event is. They accumulate.
fn reminders(summary: &str, start: DateTime<Utc>, now: DateTime<Utc>) -> Vec<FeedAlarm> {
    let days = days_until(start, now);
    let mut alarms = Vec::new();

    if days > 7 {
        alarms.push(FeedAlarm {
            before: Duration::days(7),
            description: format!("{} is in 1 week", summary),
        });
    }

    if days > 1 {
        alarms.push(FeedAlarm {
            before: Duration::days(1),
            description: format!("{} is tomorrow", summary),
        });
    }

    if days >= 0 {
        alarms.push(FeedAlarm {
            before: Duration::hours(1),
            description: format!("{} starts in 1 hour", summary),
        });
    }

    alarms
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap()
    }

    fn make_test_event(offset: Duration) -> Event {
        Event::new("Launch X", "tech/AI", now() + offset)
    }

    fn entry_for(event: &Event) -> FeedEntry {
        FeedEntry::from_event(event, event.start().unwrap(), "https://www.whenext.de", now())
    }

    #[test]
    fn test_entry_basics() {
        let event = make_test_event(Duration::days(3));
        let entry = entry_for(&event);

        assert_eq!(entry.end - entry.start, Duration::hours(2));
        assert_eq!(entry.summary, "Launch X");
        assert_eq!(entry.categories, vec!["tech", "AI"]);
        assert_eq!(entry.organizer, "Whenext");
        assert_eq!(entry.url, format!("https://www.whenext.de/event/{}", event.uid()));
        assert!(entry.custom_properties.is_empty());
        assert_eq!(entry.location, None);
    }

    #[test]
    fn test_description_parts_in_order() {
        let mut event = make_test_event(Duration::days(3));
        event.description = Some("Big launch".to_string());
        event.notes = Some("Rumored".to_string());
        event.confidence = Some(0.856);
        event.source = Some("The Verge".to_string());
        event.source_url = Some("https://example.com/launch".to_string());

        let entry = entry_for(&event);

        assert_eq!(
            entry.description,
            "Big launch\n\nNotes: Rumored\n\nConfidence: 86%\n\nSource: The Verge\n\n\
             More info: https://example.com/launch\n\n📅 Tracked by Whenext - https://www.whenext.de"
        );
        assert_eq!(entry.organizer, "The Verge");
        assert_eq!(entry.url, "https://example.com/launch");
        assert_eq!(
            entry.custom_properties,
            vec![
                ("X-WHENEXT-CONFIDENCE".to_string(), "0.856".to_string()),
                ("X-WHENEXT-SOURCE".to_string(), "The Verge".to_string()),
            ]
        );
    }

    #[test]
    fn test_unusable_source_url_falls_back_to_event_page() {
        let fallback = |event: &Event| format!("https://www.whenext.de/event/{}", event.uid());

        for bad in [
            "https://x.example/a\nSTATUS:CANCELLED",
            "https://x.example/a\r\nSTATUS:CANCELLED",
            "javascript:alert(1)",
            "not a url",
            "",
        ] {
            let mut event = make_test_event(Duration::days(3));
            event.source_url = Some(bad.to_string());

            assert_eq!(entry_for(&event).url, fallback(&event), "source_url {:?}", bad);
        }
    }

    #[test]
    fn test_description_with_only_footer() {
        let entry = entry_for(&make_test_event(Duration::days(3)));
        assert_eq!(entry.description, "📅 Tracked by Whenext - https://www.whenext.de");
    }

    #[test]
    fn test_explicit_location_wins_over_extraction() {
        let mut event = make_test_event(Duration::days(3));
        event.description = Some("Live in Berlin".to_string());
        assert_eq!(entry_for(&event).location, Some("berlin".to_string()));

        event.location = Some("Moscone Center".to_string());
        assert_eq!(entry_for(&event).location, Some("Moscone Center".to_string()));
    }

    #[test]
    fn test_days_until_rounds_up() {
        assert_eq!(days_until(now() + Duration::hours(1), now()), 1);
        assert_eq!(days_until(now() + Duration::days(1), now()), 1);
        assert_eq!(days_until(now() + Duration::days(7) + Duration::minutes(1), now()), 8);
        assert_eq!(days_until(now(), now()), 0);
    }

    #[test]
    fn test_far_event_gets_three_reminders() {
        let entry = entry_for(&make_test_event(Duration::days(30)));
        let befores: Vec<Duration> = entry.alarms.iter().map(|a| a.before).collect();

        assert_eq!(
            befores,
            vec![Duration::days(7), Duration::days(1), Duration::hours(1)]
        );
        assert_eq!(entry.alarms[0].description, "Launch X is in 1 week");
        assert_eq!(entry.alarms[1].description, "Launch X is tomorrow");
        assert_eq!(entry.alarms[2].description, "Launch X starts in 1 hour");
    }

    #[test]
    fn test_week_away_event_skips_weekly_reminder() {
        let entry = entry_for(&make_test_event(Duration::days(7)));
        assert_eq!(entry.alarms.len(), 2);
        assert_eq!(entry.alarms[0].before, Duration::days(1));
    }

    #[test]
    fn test_same_day_event_gets_hourly_reminder_only() {
        let entry = entry_for(&make_test_event(Duration::hours(5)));
        assert_eq!(entry.alarms.len(), 1);
        assert_eq!(entry.alarms[0].before, Duration::hours(1));
    }
}
