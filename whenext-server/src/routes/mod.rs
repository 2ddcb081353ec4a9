pub mod calendar;
pub mod events;
pub mod robots;

use axum::{
    Json, Router,
    extract::{FromRequestParts, Query},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::error;
use whenext_core::WhenextError;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(calendar::router())
        .merge(events::router())
        .merge(robots::router())
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Convert core errors to HTTP responses.
///
/// Client errors carry their message; server errors get a generic one and
/// the details only go to the log.
pub struct AppError(WhenextError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            err if err.is_client_error() => (StatusCode::BAD_REQUEST, err.to_string()),
            WhenextError::DatasetUnavailable(_) | WhenextError::DatasetMalformed(_) => {
                error!(error = %self.0, "Failed to load events data");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to load events data".to_string(),
                )
            }
            _ => {
                error!(error = %self.0, "Calendar feed error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error while generating calendar feed".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<WhenextError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// `Query` whose rejection is reported like every other API error.
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError(WhenextError::InvalidQuery(rejection.body_text())))?;

        Ok(ApiQuery(value))
    }
}
