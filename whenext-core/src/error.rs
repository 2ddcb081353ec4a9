//! Error types for Whenext.

use thiserror::Error;

use crate::category::CalendarCategory;

/// Errors that can occur while loading events or building feeds.
#[derive(Error, Debug)]
pub enum WhenextError {
    #[error(
        "Invalid category. Available categories: {}. Received: {received}",
        CalendarCategory::valid_list()
    )]
    InvalidCategory { received: String },

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Event dataset unavailable: {0}")]
    DatasetUnavailable(String),

    #[error("Event dataset malformed: {0}")]
    DatasetMalformed(String),

    #[error("Calendar serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WhenextError {
    /// True for errors caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WhenextError::InvalidCategory { .. }
                | WhenextError::InvalidTimezone(_)
                | WhenextError::InvalidQuery(_)
        )
    }
}

/// Result type alias for Whenext operations.
pub type WhenextResult<T> = Result<T, WhenextError>;
