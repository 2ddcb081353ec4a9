//! Event records as they appear in the dataset.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::parse_categories;

/// An upcoming (or past) event tracked by Whenext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    /// One or more tags joined by `/`, e.g. `"tech/AI"`
    #[serde(default)]
    pub category: String,
    pub event_date_iso: String,
    /// Seconds since epoch, used for sorting
    #[serde(default)]
    pub unix_timestamp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Between 0 and 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    // Presentation only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl Event {
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        start: DateTime<Utc>,
    ) -> Self {
        Event {
            id: None,
            title: title.into(),
            category: category.into(),
            event_date_iso: start.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            unix_timestamp: start.timestamp(),
            description: None,
            notes: None,
            source: None,
            source_url: None,
            confidence: None,
            tags: Vec::new(),
            location: None,
            timezone: None,
            icon: None,
            logo: None,
            logo_url: None,
        }
    }

    /// Start instant parsed from `event_date_iso`, if it parses.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        parse_instant(&self.event_date_iso)
    }

    /// An event is expired once its start is at or before `now`.
    /// Unparsable dates never count as expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.start().is_some_and(|start| start <= now)
    }

    pub fn categories(&self) -> Vec<String> {
        parse_categories(&self.category)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories().iter().any(|c| c == category)
    }

    /// The event's own id, or one derived from title and date.
    ///
    /// Derived ids are stable across requests, so two events with the same
    /// title and date and no id share a UID.
    pub fn uid(&self) -> String {
        match &self.id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => format!("{}-{}", self.title, self.event_date_iso)
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_lowercase(),
        }
    }
}

/// Parse an ISO-8601 timestamp. Naive values are taken as UTC and bare dates
/// as midnight UTC.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
