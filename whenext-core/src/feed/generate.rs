//! iCalendar feed generation.

use chrono::{DateTime, Utc};
use icalendar::{
    Alarm, Calendar, Component, EventLike, EventStatus, Property, Trigger, ValueType,
};

use super::entry::{FeedEntry, ORGANIZER_EMAIL};
use crate::error::{WhenextError, WhenextResult};

pub const PRODUCT_ID: &str = "-//Whenext//Multi-Countdown Calendar//EN";

/// How often subscribed clients should refresh.
const REFRESH_INTERVAL: &str = "PT24H";

/// Calendar-level metadata written before the events.
#[derive(Debug, Clone)]
pub struct CalendarHeader {
    pub name: String,
    pub description: String,
    pub timezone: String,
    /// Where the feed is published
    pub url: String,
}

/// Serialize a whole feed.
pub fn generate_calendar(
    header: &CalendarHeader,
    entries: &[FeedEntry],
    dtstamp: DateTime<Utc>,
) -> WhenextResult<String> {
    let mut cal = Calendar::empty();
    cal.append_property(("VERSION", "2.0"));
    cal.append_property(("PRODID", PRODUCT_ID));
    cal.append_property(("CALSCALE", "GREGORIAN"));
    cal.append_property(("METHOD", "PUBLISH"));

    // NAME is written unescaped, so it has to stay on one line
    cal.name(&single_line(&header.name));
    cal.description(&text_value(&header.description));
    cal.append_property(("TIMEZONE-ID", header.timezone.as_str()));
    cal.timezone(header.timezone.as_str());

    let url = uri_value(&header.url);
    cal.append_property(("URL", url.as_str()));
    cal.append_property(
        Property::new("SOURCE", url.as_str())
            .append_parameter(ValueType::Uri)
            .done(),
    );
    cal.append_property(
        Property::new("REFRESH-INTERVAL", REFRESH_INTERVAL)
            .append_parameter(ValueType::Duration)
            .done(),
    );
    cal.append_property(("X-PUBLISHED-TTL", REFRESH_INTERVAL));

    for entry in entries {
        cal.push(build_event(entry, dtstamp));
    }

    let output: String = (&cal)
        .try_into()
        .map_err(|e: std::fmt::Error| WhenextError::Serialization(e.to_string()))?;

    Ok(strip_alarm_stamps(&output))
}

fn build_event(entry: &FeedEntry, dtstamp: DateTime<Utc>) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&text_value(&entry.uid));
    ics_event.sequence(0);
    ics_event.timestamp(dtstamp);
    ics_event.starts(entry.start);
    ics_event.ends(entry.end);
    ics_event.summary(&text_value(&entry.summary));
    ics_event.description(&text_value(&entry.description));

    if let Some(ref location) = entry.location {
        ics_event.location(&text_value(location));
    }

    // One CATEGORIES line per tag keeps commas inside a tag unambiguous
    for category in &entry.categories {
        ics_event.append_multi_property(("CATEGORIES", text_value(category).as_str()));
    }

    ics_event.status(EventStatus::Confirmed);
    ics_event.add_property("TRANSP", "OPAQUE");

    let mut organizer = Property::new("ORGANIZER", format!("mailto:{}", ORGANIZER_EMAIL));
    organizer.add_parameter("CN", &param_value(&entry.organizer));
    ics_event.append_property(organizer);

    ics_event.append_property(
        Property::new("URL", uri_value(&entry.url))
            .append_parameter(ValueType::Uri)
            .done(),
    );

    for (key, value) in &entry.custom_properties {
        ics_event.add_property(key.as_str(), text_value(value));
    }

    for alarm in &entry.alarms {
        let trigger = Trigger::before_start(alarm.before);
        ics_event.alarm(Alarm::display(&text_value(&alarm.description), trigger));
    }

    ics_event.done()
}

/// Drop the DTSTAMP and UID lines the icalendar crate adds to every VALARM.
/// They are not required there and the UID is random, which would make
/// every refresh look like a change.
fn strip_alarm_stamps(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());
    let mut in_valarm = false;

    for line in ics.split_terminator("\r\n") {
        if line == "BEGIN:VALARM" {
            in_valarm = true;
        } else if line == "END:VALARM" {
            in_valarm = false;
        }

        if in_valarm && (line.starts_with("DTSTAMP:") || line.starts_with("UID:")) {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

/// TEXT values are escaped by icalendar, which only knows `\n` as a line
/// break.
fn text_value(value: &str) -> String {
    value.replace("\r\n", "\n").replace('\r', "\n")
}

fn single_line(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// URI values are written as-is, so control characters must never reach
/// them.
fn uri_value(value: &str) -> String {
    value.chars().filter(|c| !c.is_control()).collect()
}

/// Quotes are not allowed inside a parameter value.
fn param_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '"' && !c.is_control())
        .collect()
}
