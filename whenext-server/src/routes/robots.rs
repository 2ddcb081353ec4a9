use axum::{Router, extract::State, http::header, response::IntoResponse, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/robots.txt", get(robots))
}

/// GET /robots.txt
async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    let site_url = state.config().site_url.trim_end_matches('/');

    let body = format!(
        "\
User-agent: *
Allow: /

# Sitemap location
Sitemap: {site_url}/sitemap.xml

Crawl-delay: 1

User-agent: Googlebot
Allow: /

User-agent: Bingbot
Allow: /
"
    );

    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
}
