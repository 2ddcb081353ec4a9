//! Core of Whenext: countdown events, their filtering and sorting, and the
//! iCalendar subscription feeds built from them.
//!
//! - `event` and `category` model the dataset
//! - `filter` produces sorted, filtered views and per-category counts
//! - `feed` builds iCalendar feeds, `links` the URLs to subscribe to them
//! - `dataset` and `config` load the events and the settings

pub mod category;
pub mod config;
pub mod dataset;
pub mod error;
pub mod event;
pub mod feed;
pub mod filter;
pub mod links;
pub mod logging;

pub use category::{CalendarCategory, parse_categories};
pub use error::{WhenextError, WhenextResult};
pub use event::Event;
