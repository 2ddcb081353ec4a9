//! Countdown list and category endpoints

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use chrono::Utc;
use serde::Serialize;
use whenext_core::CalendarCategory;
use whenext_core::Event;
use whenext_core::filter::{self, FilterState};
use whenext_core::links::{CalendarLinks, LinkOptions};

use crate::routes::{ApiQuery, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(list_events))
        .route("/api/categories", get(list_categories))
}

/// Filtered view of the events
#[derive(Serialize)]
pub struct EventsResponse {
    pub events: Vec<Event>,
    /// Event count per category under the same expiry rules
    pub counts: BTreeMap<String, usize>,
    pub available_categories: Vec<String>,
}

/// GET /api/events - Events filtered and sorted per the query
async fn list_events(
    State(state): State<AppState>,
    ApiQuery(filter_state): ApiQuery<FilterState>,
) -> Result<Json<EventsResponse>, AppError> {
    let events = state.events().await?;
    let now = Utc::now();

    Ok(Json(EventsResponse {
        events: filter::filtered_events(&events, &filter_state, now)
            .into_iter()
            .cloned()
            .collect(),
        counts: filter::category_counts(&events, &filter_state, now),
        available_categories: filter::available_categories(&events),
    }))
}

/// Feed category with its subscription links
#[derive(Serialize)]
pub struct CategoryInfo {
    pub value: CalendarCategory,
    pub label: &'static str,
    pub links: CalendarLinks,
}

/// GET /api/categories - Every feed category with its links
async fn list_categories(State(state): State<AppState>) -> Json<Vec<CategoryInfo>> {
    let categories = state
        .links()
        .all_category_links(&LinkOptions::default())
        .into_iter()
        .map(|(value, links)| CategoryInfo {
            value,
            label: value.display_name(),
            links,
        })
        .collect();

    Json(categories)
}
