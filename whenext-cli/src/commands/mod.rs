pub mod categories;
pub mod config;
pub mod events;
pub mod feed;
pub mod links;
