//! Best-effort location lookup in free text.

use std::sync::LazyLock;

use regex::Regex;

use crate::event::Event;

static LOCATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\bin\s+([a-z\s]+(?:stadt|city|vegas|francisco|angeles|york))\b",
        r"(?:@|\bat)\s+([a-z\s]+(?:arena|center|hall|venue|convention))\b",
        r"\b(?:berlin|vienna|wien|hamburg|munich|münchen|cologne|köln|frankfurt)\b",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Look for a place name in the description and notes of `event`.
///
/// Returns the first match of a small set of patterns (`in <city>`,
/// `at <venue>`, well-known city names), lower-cased.
pub fn extract_location(event: &Event) -> Option<String> {
    let text = format!(
        "{} {}",
        event.description.as_deref().unwrap_or(""),
        event.notes.as_deref().unwrap_or("")
    )
    .to_lowercase();

    LOCATION_PATTERNS.iter().find_map(|pattern| {
        let captures = pattern.captures(&text)?;
        let found = captures.get(1).or_else(|| captures.get(0))?;
        let location = found.as_str().trim();
        (!location.is_empty()).then(|| location.to_string())
    })
}
