//! Calendar subscription feeds.
//!
//! A feed is built in three steps: select the events that belong in it,
//! turn each into a [`FeedEntry`] with reminders, and serialize the result as
//! iCalendar text.

mod entry;
mod generate;
mod location;

pub use entry::{FeedAlarm, FeedEntry};
pub use generate::{CalendarHeader, generate_calendar};
pub use location::extract_location;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category::{calendar_description, calendar_name, is_all};
use crate::error::WhenextResult;
use crate::event::Event;
use crate::links::LinkGenerator;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Berlin;

/// Number of events the lightweight feed emits.
pub const MINIMAL_FEED_LIMIT: usize = 10;

/// Optional narrowing of a feed.
#[derive(Debug, Clone, Default)]
pub struct FeedOptions {
    /// Keep events sharing at least one of these tags (empty = no filter)
    pub tags: Vec<String>,
    /// Keep events starting within this many days
    pub days: Option<i64>,
    /// Timezone hint for subscribing clients
    pub timezone: Option<Tz>,
}

/// How many of the selected events a feed emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedVariant {
    /// Every selected event
    Full,
    /// Only the first `limit` selected events, in input order
    Minimal { limit: usize },
}

impl Default for FeedVariant {
    fn default() -> Self {
        FeedVariant::Minimal {
            limit: MINIMAL_FEED_LIMIT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedBuilder {
    links: LinkGenerator,
    variant: FeedVariant,
    default_timezone: Tz,
}

impl FeedBuilder {
    pub fn new(base_url: &str) -> Self {
        FeedBuilder {
            links: LinkGenerator::new(base_url),
            variant: FeedVariant::Full,
            default_timezone: DEFAULT_TIMEZONE,
        }
    }

    pub fn with_variant(mut self, variant: FeedVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_default_timezone(mut self, timezone: Tz) -> Self {
        self.default_timezone = timezone;
        self
    }

    pub fn variant(&self) -> FeedVariant {
        self.variant
    }

    /// Build the feed for `category` as of now.
    pub fn build(
        &self,
        events: &[Event],
        category: &str,
        options: &FeedOptions,
    ) -> WhenextResult<String> {
        self.build_at(events, category, options, Utc::now())
    }

    /// Build the feed for `category` as of `now`.
    ///
    /// An empty selection still produces a valid calendar.
    pub fn build_at(
        &self,
        events: &[Event],
        category: &str,
        options: &FeedOptions,
        now: DateTime<Utc>,
    ) -> WhenextResult<String> {
        let base_url = self.links.base_url();
        let entries: Vec<FeedEntry> = self
            .select_events(events, category, options, now)
            .into_iter()
            .filter_map(|event| {
                let start = event.start()?;
                Some(FeedEntry::from_event(event, start, base_url, now))
            })
            .collect();

        debug!(category, entries = entries.len(), "Generating calendar feed");

        let header = CalendarHeader {
            name: calendar_name(category),
            description: calendar_description(category),
            timezone: options
                .timezone
                .unwrap_or(self.default_timezone)
                .name()
                .to_string(),
            url: self.links.feed_url(category),
        };

        generate_calendar(&header, &entries, now)
    }

    /// Events that belong in the feed, in input order.
    pub fn select_events<'a>(
        &self,
        events: &'a [Event],
        category: &str,
        options: &FeedOptions,
        now: DateTime<Utc>,
    ) -> Vec<&'a Event> {
        // A window too large to represent is no window at all
        let window_end = options
            .days
            .filter(|days| *days > 0)
            .and_then(Duration::try_days)
            .and_then(|window| now.checked_add_signed(window));

        let selected = events
            .iter()
            .filter(|event| is_all(category) || event.has_category(category))
            .filter(|event| {
                options.tags.is_empty() || event.tags.iter().any(|tag| options.tags.contains(tag))
            })
            .filter(|event| match (window_end, event.start()) {
                (Some(end), Some(start)) => start >= now && start <= end,
                (Some(_), None) => false,
                (None, _) => true,
            })
            // Past events never go out, whatever the window said
            .filter(|event| event.start().is_some_and(|start| start > now));

        match self.variant {
            FeedVariant::Full => selected.collect(),
            FeedVariant::Minimal { limit } => selected.take(limit).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap()
    }

    fn make_event(title: &str, category: &str, offset: Duration) -> Event {
        Event::new(title, category, now() + offset)
    }

    fn builder() -> FeedBuilder {
        FeedBuilder::new("https://www.whenext.de")
    }

    fn count_vevents(ics: &str) -> usize {
        ics.lines().filter(|l| *l == "BEGIN:VEVENT").count()
    }

    #[test]
    fn test_launch_example() {
        let json = r#"[{"title":"Launch X","category":"tech","event_date_iso":"2999-01-01T10:00:00Z","unix_timestamp":32503680000}]"#;
        let events: Vec<Event> = serde_json::from_str(json).unwrap();

        let ics = builder()
            .build_at(&events, "tech", &FeedOptions::default(), now())
            .unwrap();

        assert_eq!(count_vevents(&ics), 1);
        assert!(ics.contains("SUMMARY:Launch X\r\n"));
        assert!(ics.contains("DTSTART:29990101T100000Z\r\n"));
        assert!(ics.contains("DTEND:29990101T120000Z\r\n"));
        assert!(ics.contains("CATEGORIES:tech\r\n"));
        assert!(ics.contains("URL:https://www.whenext.de/api/calendar/tech.ics\r\n"));
    }

    #[test]
    fn test_category_filter_and_passthrough() {
        let events = vec![
            make_event("Tech", "tech/AI", Duration::days(2)),
            make_event("Game", "gaming", Duration::days(2)),
            make_event("Nothing", "", Duration::days(2)),
        ];
        let options = FeedOptions::default();

        let ai = builder().select_events(&events, "AI", &options, now());
        assert_eq!(ai.len(), 1);
        assert_eq!(ai[0].title, "Tech");

        assert_eq!(builder().select_events(&events, "alle", &options, now()).len(), 3);
        assert_eq!(builder().select_events(&events, "all", &options, now()).len(), 3);
    }

    #[test]
    fn test_tag_filter_needs_one_shared_tag() {
        let mut tagged = make_event("Tagged", "tech", Duration::days(2));
        tagged.tags = vec!["apple".to_string(), "keynote".to_string()];
        let untagged = make_event("Untagged", "tech", Duration::days(2));
        let events = vec![tagged, untagged];

        let options = FeedOptions {
            tags: vec!["keynote".to_string(), "wwdc".to_string()],
            ..FeedOptions::default()
        };

        let selected = builder().select_events(&events, "tech", &options, now());
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].title, "Tagged");
    }

    #[test]
    fn test_days_window() {
        let events = vec![
            make_event("Soon", "tech", Duration::days(3)),
            make_event("Edge", "tech", Duration::days(7)),
            make_event("Later", "tech", Duration::days(8)),
        ];
        let options = FeedOptions {
            days: Some(7),
            ..FeedOptions::default()
        };

        let titles: Vec<&str> = builder()
            .select_events(&events, "tech", &options, now())
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Soon", "Edge"]);
    }

    #[test]
    fn test_non_positive_days_means_no_window() {
        let events = vec![make_event("Far", "tech", Duration::days(400))];
        let options = FeedOptions {
            days: Some(0),
            ..FeedOptions::default()
        };
        assert_eq!(builder().select_events(&events, "tech", &options, now()).len(), 1);
    }

    #[test]
    fn test_source_url_cannot_inject_properties() {
        let mut event = make_event("Launch X", "tech", Duration::days(2));
        event.source_url = Some("https://x.example/a\nSTATUS:CANCELLED".to_string());
        let uid = event.uid();

        let ics = builder()
            .build_at(&[event], "tech", &FeedOptions::default(), now())
            .unwrap();

        assert!(!ics.contains("\nSTATUS:CANCELLED"), "ICS:\n{}", ics);
        assert!(ics.contains("STATUS:CONFIRMED\r\n"));
        let fallback = format!("URL;VALUE=URI:https://www.whenext.de/event/{}", uid);
        assert!(
            icalendar::parser::unfold(&ics).contains(&fallback),
            "ICS:\n{}",
            ics
        );
    }

    #[test]
    fn test_huge_days_means_no_window() {
        let events = vec![make_event("Far", "tech", Duration::days(400))];

        for days in [10_000_000_000, i64::MAX] {
            let options = FeedOptions {
                days: Some(days),
                ..FeedOptions::default()
            };
            let ics = builder().build_at(&events, "tech", &options, now()).unwrap();

            assert_eq!(count_vevents(&ics), 1, "days = {}", days);
        }
    }

    #[test]
    fn test_never_emits_past_or_current_events() {
        let mut undated = make_event("Undated", "tech", Duration::days(1));
        undated.event_date_iso = "TBA".to_string();
        let events = vec![
            make_event("Past", "tech", -Duration::hours(1)),
            make_event("Now", "tech", Duration::zero()),
            make_event("Future", "tech", Duration::seconds(1)),
            undated,
        ];

        for days in [None, Some(1)] {
            let options = FeedOptions {
                days,
                ..FeedOptions::default()
            };
            let ics = builder().build_at(&events, "alle", &options, now()).unwrap();

            assert_eq!(count_vevents(&ics), 1, "ICS:\n{}", ics);
            assert!(ics.contains("SUMMARY:Future\r\n"));
        }
    }

    #[test]
    fn test_minimal_variant_caps_in_input_order() {
        let mut events: Vec<Event> = (0..15)
            .map(|i| make_event(&format!("Event {}", i), "tech", Duration::days(20 - i)))
            .collect();
        events.insert(0, make_event("Old", "tech", -Duration::days(1)));

        let minimal = builder().with_variant(FeedVariant::default());
        let selected = minimal.select_events(&events, "tech", &FeedOptions::default(), now());
        assert_eq!(selected.len(), 10);
        assert_eq!(selected[0].title, "Event 0");
        assert_eq!(selected[9].title, "Event 9");

        let full = builder().select_events(&events, "tech", &FeedOptions::default(), now());
        assert_eq!(full.len(), 15);
    }

    #[test]
    fn test_empty_feed_is_valid_calendar() {
        let ics = builder()
            .build_at(&[], "gaming", &FeedOptions::default(), now())
            .unwrap();

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert!(ics.contains("X-WR-CALNAME:Whenext - Gaming Events\r\n"));
        assert_eq!(count_vevents(&ics), 0);
    }

    #[test]
    fn test_timezone_hint() {
        let default = builder()
            .build_at(&[], "tech", &FeedOptions::default(), now())
            .unwrap();
        assert!(default.contains("X-WR-TIMEZONE:Europe/Berlin\r\n"));

        let options = FeedOptions {
            timezone: Some(chrono_tz::America::New_York),
            ..FeedOptions::default()
        };
        let custom = builder().build_at(&[], "tech", &options, now()).unwrap();
        assert!(custom.contains("X-WR-TIMEZONE:America/New_York\r\n"));
    }

    #[test]
    fn test_duplicate_derived_uids_do_not_fail() {
        let events = vec![
            make_event("Twin", "tech", Duration::days(2)),
            make_event("Twin", "tech", Duration::days(2)),
        ];

        let ics = builder()
            .build_at(&events, "tech", &FeedOptions::default(), now())
            .unwrap();
        let uids: Vec<&str> = ics.lines().filter(|l| l.starts_with("UID:")).collect();
        assert_eq!(uids.len(), 2);
        assert_eq!(uids[0], uids[1]);
    }
}
