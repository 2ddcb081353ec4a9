//! Calendar subscription feed endpoint

use std::str::FromStr;

use axum::{
    Router,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::info;
use whenext_core::feed::FeedOptions;
use whenext_core::{CalendarCategory, WhenextError, WhenextResult};

use crate::routes::{ApiQuery, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/calendar/{category}", get(calendar_feed))
}

/// Query options of a feed request
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    /// Comma-separated tags
    pub tags: Option<String>,
    pub days: Option<i64>,
    pub timezone: Option<String>,
}

impl FeedQuery {
    fn into_options(self) -> WhenextResult<FeedOptions> {
        let tags = self
            .tags
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();

        let timezone = match self.timezone.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) => Some(
                Tz::from_str(name).map_err(|_| WhenextError::InvalidTimezone(name.to_string()))?,
            ),
        };

        Ok(FeedOptions {
            tags,
            days: self.days,
            timezone,
        })
    }
}

/// GET /api/calendar/:category(.ics) - iCalendar feed for a category
async fn calendar_feed(
    State(state): State<AppState>,
    Path(category): Path<String>,
    ApiQuery(query): ApiQuery<FeedQuery>,
) -> Result<Response, AppError> {
    let name = category.strip_suffix(".ics").unwrap_or(&category);

    // Validate before touching the dataset
    let category = CalendarCategory::from_str(name)?;
    let options = query.into_options()?;

    let events = state.events().await?;
    let body = state
        .feed_builder()
        .build(&events, category.as_str(), &options)?;

    info!(%category, events = events.len(), "Served calendar feed");

    let headers = [
        (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}-calendar.ics\"", category),
        ),
        (
            header::CACHE_CONTROL,
            format!("public, max-age={}", state.config().cache_max_age),
        ),
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
    ];

    Ok((headers, body).into_response())
}
