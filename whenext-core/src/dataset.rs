//! Loading the event dataset.
//!
//! The dataset is a JSON array of events. It is looked up in an ordered list
//! of sources; the first one that yields a parseable array wins.

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::{WhenextError, WhenextResult};
use crate::event::Event;

/// Relative locations tried when nothing else is configured.
pub const DEFAULT_DATASET_PATHS: [&str; 3] = [
    "data/events.json",
    "public/data/events.json",
    ".output/public/data/events.json",
];

/// One place the dataset may be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    File(PathBuf),
    Url(String),
}

impl DatasetSource {
    /// A file source; `~` is expanded.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
        DatasetSource::File(PathBuf::from(expanded))
    }

    async fn load(&self) -> WhenextResult<Vec<Event>> {
        let content = match self {
            DatasetSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| {
                    WhenextError::DatasetUnavailable(format!("{}: {}", path.display(), e))
                })?,
            DatasetSource::Url(url) => fetch(url).await?,
        };

        parse_events(&content).map_err(|e| match e {
            WhenextError::DatasetMalformed(msg) => {
                WhenextError::DatasetMalformed(format!("{}: {}", self, msg))
            }
            other => other,
        })
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::File(path) => write!(f, "{}", path.display()),
            DatasetSource::Url(url) => f.write_str(url),
        }
    }
}

async fn fetch(url: &str) -> WhenextResult<String> {
    let unavailable =
        |e: reqwest::Error| WhenextError::DatasetUnavailable(format!("{}: {}", url, e));

    reqwest::get(url)
        .await
        .map_err(unavailable)?
        .error_for_status()
        .map_err(unavailable)?
        .text()
        .await
        .map_err(unavailable)
}

/// Parse a JSON array of events.
pub fn parse_events(content: &str) -> WhenextResult<Vec<Event>> {
    serde_json::from_str(content).map_err(|e| WhenextError::DatasetMalformed(e.to_string()))
}

/// Tries each source in order until one loads.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    sources: Vec<DatasetSource>,
}

impl DatasetLoader {
    pub fn new(sources: Vec<DatasetSource>) -> Self {
        DatasetLoader { sources }
    }

    pub fn sources(&self) -> &[DatasetSource] {
        &self.sources
    }

    /// Load events from the first source that works.
    ///
    /// If every source fails, the error is `DatasetMalformed` when at least
    /// one source could be read but not parsed, otherwise
    /// `DatasetUnavailable`.
    pub async fn load(&self) -> WhenextResult<Vec<Event>> {
        let mut malformed = None;
        let mut unavailable = Vec::new();

        for source in &self.sources {
            match source.load().await {
                Ok(events) => {
                    debug!(%source, count = events.len(), "Loaded event dataset");
                    return Ok(events);
                }
                Err(WhenextError::DatasetMalformed(msg)) => {
                    warn!(%source, error = %msg, "Event dataset is malformed, trying next source");
                    malformed.get_or_insert(msg);
                }
                Err(e) => {
                    debug!(%source, error = %e, "Event dataset source unavailable");
                    unavailable.push(e.to_string());
                }
            }
        }

        match malformed {
            Some(msg) => Err(WhenextError::DatasetMalformed(msg)),
            None if self.sources.is_empty() => Err(WhenextError::DatasetUnavailable(
                "no dataset sources configured".to_string(),
            )),
            None => Err(WhenextError::DatasetUnavailable(unavailable.join("; "))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const DATASET: &str = r#"[
        {"title": "Launch X", "category": "tech", "event_date_iso": "2999-01-01T10:00:00Z", "unix_timestamp": 32503680000}
    ]"#;

    #[test]
    fn test_parse_events() {
        let events = parse_events(DATASET).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Launch X");

        assert!(matches!(
            parse_events(r#"{"title": "not an array"}"#),
            Err(WhenextError::DatasetMalformed(_))
        ));
    }

    #[tokio::test]
    async fn test_first_working_source_wins() {
        let dir = TempDir::new().unwrap();
        let second = dir.path().join("second.json");
        let third = dir.path().join("third.json");
        fs::write(&second, DATASET).unwrap();
        fs::write(&third, "[]").unwrap();

        let loader = DatasetLoader::new(vec![
            DatasetSource::file(dir.path().join("missing.json")),
            DatasetSource::file(&second),
            DatasetSource::file(&third),
        ]);

        let events = loader.load().await.unwrap();
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_source_falls_through() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("broken.json");
        let good = dir.path().join("good.json");
        fs::write(&broken, "[{").unwrap();
        fs::write(&good, DATASET).unwrap();

        let loader = DatasetLoader::new(vec![DatasetSource::file(&broken), DatasetSource::file(&good)]);
        assert_eq!(loader.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_all_sources_failing() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("broken.json");
        fs::write(&broken, "not json").unwrap();

        let missing_only = DatasetLoader::new(vec![DatasetSource::file(dir.path().join("missing.json"))]);
        assert!(matches!(
            missing_only.load().await,
            Err(WhenextError::DatasetUnavailable(_))
        ));

        let with_broken = DatasetLoader::new(vec![
            DatasetSource::file(dir.path().join("missing.json")),
            DatasetSource::file(&broken),
        ]);
        assert!(matches!(
            with_broken.load().await,
            Err(WhenextError::DatasetMalformed(_))
        ));

        assert!(matches!(
            DatasetLoader::new(vec![]).load().await,
            Err(WhenextError::DatasetUnavailable(_))
        ));
    }

    #[test]
    fn test_file_source_expands_tilde() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(
            DatasetSource::file("~/events.json"),
            DatasetSource::File(home.join("events.json"))
        );
    }
}
