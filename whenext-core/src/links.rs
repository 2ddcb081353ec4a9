//! Subscription links for calendar feeds.

use serde::Serialize;
use url::form_urlencoded;

use crate::category::CalendarCategory;

const QR_CODE_SERVICE: &str = "https://api.qrserver.com/v1/create-qr-code/?size=200x200&data=";

/// Query options carried by a subscription link.
#[derive(Debug, Clone, Default)]
pub struct LinkOptions {
    pub tags: Vec<String>,
    pub days: Option<i64>,
    pub timezone: Option<String>,
}

/// The same feed as a `webcal://` and an `https://` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarLinks {
    pub webcal_url: String,
    pub https_url: String,
    /// Same as `https_url`
    pub feed_url: String,
}

#[derive(Debug, Clone)]
pub struct LinkGenerator {
    base_url: String,
}

impl LinkGenerator {
    pub fn new(base_url: &str) -> Self {
        LinkGenerator {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Feed URL without query options.
    pub fn feed_url(&self, category: &str) -> String {
        format!("{}{}", self.base_url, feed_path(category))
    }

    pub fn links(&self, category: &str, options: &LinkOptions) -> CalendarLinks {
        let mut path = feed_path(category);

        let query = query_string(options);
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query);
        }

        let https_url = format!("{}{}", self.base_url, path);
        let webcal_url = format!("webcal://{}{}", strip_scheme(&self.base_url), path);

        CalendarLinks {
            webcal_url,
            feed_url: https_url.clone(),
            https_url,
        }
    }

    /// Links for every feed category, in display order.
    pub fn all_category_links(
        &self,
        options: &LinkOptions,
    ) -> Vec<(CalendarCategory, CalendarLinks)> {
        CalendarCategory::all()
            .iter()
            .map(|&category| (category, self.links(category.as_str(), options)))
            .collect()
    }

    /// Page URL that opens the subscription dialog for `category`.
    pub fn shareable_url(&self, category: &str) -> String {
        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("calendar", category)
            .finish();
        format!("{}/?{}", self.base_url, query)
    }

    /// Image URL of a QR code encoding the webcal link.
    pub fn qr_code_url(&self, category: &str) -> String {
        let links = self.links(category, &LinkOptions::default());
        let data: String = form_urlencoded::byte_serialize(links.webcal_url.as_bytes()).collect();
        format!("{}{}", QR_CODE_SERVICE, data)
    }
}

fn feed_path(category: &str) -> String {
    format!("/api/calendar/{}.ics", category)
}

fn query_string(options: &LinkOptions) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());

    if !options.tags.is_empty() {
        query.append_pair("tags", &options.tags.join(","));
    }

    if let Some(days) = options.days.filter(|d| *d > 0) {
        query.append_pair("days", &days.to_string());
    }

    if let Some(timezone) = options.timezone.as_deref().filter(|tz| !tz.is_empty()) {
        query.append_pair("timezone", timezone);
    }

    query.finish()
}

fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}
