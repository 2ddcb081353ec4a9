//! Category strings and the fixed set of feed categories.
//!
//! Events carry one or more tags joined by `/` (e.g. `"tech/AI"`). Feeds are
//! published for a fixed set of categories, each with a display name and a
//! description. Lookups by plain string always fall back to a generated
//! label instead of failing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WhenextError;

/// Pseudo-category that matches every event in the filter engine.
pub const ALL: &str = "all";

/// Pseudo-category that matches every event in calendar feeds.
pub const ALLE: &str = "alle";

/// Split a slash-delimited category string into trimmed, non-empty tags.
///
/// Order is preserved; the first tag is the primary category.
pub fn parse_categories(category: &str) -> Vec<String> {
    category
        .split('/')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether `category` selects every event (`all` or `alle`).
pub fn is_all(category: &str) -> bool {
    category == ALL || category == ALLE
}

/// A category a calendar feed can be published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalendarCategory {
    #[serde(rename = "alle")]
    Alle,
    #[serde(rename = "tech")]
    Tech,
    #[serde(rename = "gaming")]
    Gaming,
    #[serde(rename = "popkultur")]
    Popkultur,
    #[serde(rename = "finanzen")]
    Finanzen,
    #[serde(rename = "entertainment")]
    Entertainment,
    #[serde(rename = "AI")]
    Ai,
    #[serde(rename = "streaming")]
    Streaming,
    #[serde(rename = "e-sports")]
    ESports,
}

const CATEGORIES: [CalendarCategory; 9] = [
    CalendarCategory::Alle,
    CalendarCategory::Tech,
    CalendarCategory::Gaming,
    CalendarCategory::Popkultur,
    CalendarCategory::Finanzen,
    CalendarCategory::Entertainment,
    CalendarCategory::Ai,
    CalendarCategory::Streaming,
    CalendarCategory::ESports,
];

impl CalendarCategory {
    /// Every feed category in display order.
    pub fn all() -> &'static [CalendarCategory] {
        &CATEGORIES
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarCategory::Alle => "alle",
            CalendarCategory::Tech => "tech",
            CalendarCategory::Gaming => "gaming",
            CalendarCategory::Popkultur => "popkultur",
            CalendarCategory::Finanzen => "finanzen",
            CalendarCategory::Entertainment => "entertainment",
            CalendarCategory::Ai => "AI",
            CalendarCategory::Streaming => "streaming",
            CalendarCategory::ESports => "e-sports",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CalendarCategory::Alle => "All Events",
            CalendarCategory::Tech => "Tech Events",
            CalendarCategory::Gaming => "Gaming Events",
            CalendarCategory::Popkultur => "Pop Culture Events",
            CalendarCategory::Finanzen => "Finance Events",
            CalendarCategory::Entertainment => "Entertainment Events",
            CalendarCategory::Ai => "AI Events",
            CalendarCategory::Streaming => "Streaming Events",
            CalendarCategory::ESports => "E-Sports Events",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CalendarCategory::Alle => {
                "All upcoming events tracked by Whenext - never miss what's next in tech, gaming, and entertainment."
            }
            CalendarCategory::Tech => {
                "Upcoming technology events, conferences, and product launches tracked by Whenext."
            }
            CalendarCategory::Gaming => {
                "Gaming events, releases, tournaments, and conventions tracked by Whenext."
            }
            CalendarCategory::Popkultur => {
                "Pop culture events, entertainment releases, and cultural happenings tracked by Whenext."
            }
            CalendarCategory::Finanzen => {
                "Financial events, market announcements, and economic conferences tracked by Whenext."
            }
            CalendarCategory::Entertainment => {
                "Entertainment events, shows, and cultural happenings tracked by Whenext."
            }
            CalendarCategory::Ai => {
                "Artificial Intelligence events, conferences, and announcements tracked by Whenext."
            }
            CalendarCategory::Streaming => {
                "Streaming events, shows, and platform launches tracked by Whenext."
            }
            CalendarCategory::ESports => {
                "E-sports tournaments, gaming competitions, and esports events tracked by Whenext."
            }
        }
    }

    /// Comma-separated list of valid category names, for error messages.
    pub fn valid_list() -> String {
        CATEGORIES
            .iter()
            .map(CalendarCategory::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for CalendarCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalendarCategory {
    type Err = WhenextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATEGORIES
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| WhenextError::InvalidCategory {
                received: s.to_string(),
            })
    }
}

pub fn is_valid_category(category: &str) -> bool {
    category.parse::<CalendarCategory>().is_ok()
}

/// Human-readable name, e.g. `"Pop Culture Events"`.
pub fn display_name(category: &str) -> String {
    match category.parse::<CalendarCategory>() {
        Ok(known) => known.display_name().to_string(),
        Err(_) => format!("{} Events", category),
    }
}

/// Calendar title shown by subscribing clients.
pub fn calendar_name(category: &str) -> String {
    format!("Whenext - {}", display_name(category))
}

pub fn calendar_description(category: &str) -> String {
    match category.parse::<CalendarCategory>() {
        Ok(known) => known.description().to_string(),
        Err(_) => format!(
            "{} events tracked by Whenext - never miss what's next.",
            category
        ),
    }
}

/// A feed category paired with its label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOption {
    pub value: CalendarCategory,
    pub label: &'static str,
}

pub fn category_options() -> Vec<CategoryOption> {
    CATEGORIES
        .iter()
        .map(|&value| CategoryOption {
            value,
            label: value.display_name(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_categories_preserves_order() {
        assert_eq!(parse_categories("tech/AI"), vec!["tech", "AI"]);
    }

    #[test]
    fn test_parse_categories_trims_and_drops_empty() {
        assert_eq!(
            parse_categories(" gaming / e-sports //"),
            vec!["gaming", "e-sports"]
        );
        assert!(parse_categories("").is_empty());
        assert!(parse_categories(" / ").is_empty());
    }

    #[test]
    fn test_category_from_str_is_case_sensitive() {
        assert_eq!("AI".parse::<CalendarCategory>().unwrap(), CalendarCategory::Ai);
        assert!("ai".parse::<CalendarCategory>().is_err());
        assert!(is_valid_category("e-sports"));
        assert!(!is_valid_category("unknown"));
    }

    #[test]
    fn test_invalid_category_message_lists_all_categories() {
        let err = "unknown".parse::<CalendarCategory>().unwrap_err();
        let message = err.to_string();

        for category in CalendarCategory::all() {
            assert!(
                message.contains(category.as_str()),
                "Missing {} in: {}",
                category,
                message
            );
        }
        assert!(message.ends_with("Received: unknown"), "Got: {}", message);
    }

    #[test]
    fn test_display_name_falls_back_for_unknown() {
        assert_eq!(display_name("popkultur"), "Pop Culture Events");
        assert_eq!(display_name("robotics"), "robotics Events");
        assert_eq!(calendar_name("alle"), "Whenext - All Events");
        assert_eq!(calendar_name("robotics"), "Whenext - robotics Events");
        assert_eq!(
            calendar_description("robotics"),
            "robotics events tracked by Whenext - never miss what's next."
        );
    }

    #[test]
    fn test_category_options_in_fixed_order() {
        let options = category_options();
        assert_eq!(options.len(), 9);
        assert_eq!(options[0].value, CalendarCategory::Alle);
        assert_eq!(options[0].label, "All Events");
        assert_eq!(options[8].value.as_str(), "e-sports");
    }

    #[test]
    fn test_is_all() {
        assert!(is_all("all"));
        assert!(is_all("alle"));
        assert!(!is_all("tech"));
    }
}
