//! Filtering and sorting of events for countdown views.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::ALL;
use crate::event::Event;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Date,
    Category,
    Name,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Filter and sort selection for one view of the events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub category: String,
    pub sort_by: SortKey,
    pub direction: SortDirection,
    pub show_passed_events: bool,
    /// Keep only passed events (history view)
    pub history: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            category: ALL.to_string(),
            sort_by: SortKey::Date,
            direction: SortDirection::Asc,
            show_passed_events: false,
            history: false,
        }
    }
}

impl FilterState {
    pub fn toggle_sort_direction(&mut self) {
        self.direction = self.direction.toggled();
    }

    fn keeps(&self, event: &Event, now: DateTime<Utc>) -> bool {
        if self.history {
            event.is_expired(now)
        } else {
            self.show_passed_events || !event.is_expired(now)
        }
    }
}

fn matches_category(event: &Event, category: &str) -> bool {
    category == ALL || event.has_category(category)
}

/// Events matching `state`, ordered by its sort key and direction.
pub fn filtered_events<'a>(
    events: &'a [Event],
    state: &FilterState,
    now: DateTime<Utc>,
) -> Vec<&'a Event> {
    let mut filtered: Vec<&Event> = events
        .iter()
        .filter(|event| state.keeps(event, now))
        .filter(|event| matches_category(event, &state.category))
        .collect();

    filtered.sort_by(|a, b| {
        let ordering = compare(a, b, state.sort_by);
        match state.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    filtered
}

fn compare(a: &Event, b: &Event, key: SortKey) -> Ordering {
    let by_time = a.unix_timestamp.cmp(&b.unix_timestamp);

    match key {
        SortKey::Date => by_time,
        SortKey::Category => {
            let a_primary = a.categories().into_iter().next().unwrap_or_default();
            let b_primary = b.categories().into_iter().next().unwrap_or_default();
            collate(&a_primary, &b_primary).then(by_time)
        }
        SortKey::Name => collate(&a.title, &b.title).then(by_time),
    }
}

/// Case-insensitive comparison, falling back to exact order between strings
/// that only differ in case.
fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Distinct category tags across all events, sorted.
pub fn available_categories(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .flat_map(Event::categories)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Number of events in `category` after the expiry rules of `state`.
/// The category selected in `state` is ignored.
pub fn count_for_category(
    events: &[Event],
    state: &FilterState,
    category: &str,
    now: DateTime<Utc>,
) -> usize {
    events
        .iter()
        .filter(|event| state.keeps(event, now))
        .filter(|event| matches_category(event, category))
        .count()
}

/// Counts for `all` and every available category.
pub fn category_counts(
    events: &[Event],
    state: &FilterState,
    now: DateTime<Utc>,
) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    counts.insert(ALL.to_string(), count_for_category(events, state, ALL, now));

    for category in available_categories(events) {
        let count = count_for_category(events, state, &category, now);
        counts.insert(category, count);
    }

    counts
}
