//! HTTP surface of Whenext: calendar feeds, the countdown list and
//! `robots.txt`.

pub mod routes;
pub mod state;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::router()
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(state: AppState, listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}
