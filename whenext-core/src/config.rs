//! Whenext configuration.
//!
//! Settings come from built-in defaults, then an optional TOML file, then
//! `WHENEXT_*` environment variables.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::dataset::{DEFAULT_DATASET_PATHS, DatasetLoader, DatasetSource};
use crate::error::{WhenextError, WhenextResult};
use crate::feed::{FeedBuilder, FeedVariant};
use crate::links::LinkGenerator;

pub const DEFAULT_SITE_URL: &str = "https://www.whenext.de";

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "WHENEXT_CONFIG";

fn default_site_url() -> String {
    DEFAULT_SITE_URL.to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_dataset_paths() -> Vec<PathBuf> {
    DEFAULT_DATASET_PATHS.iter().map(PathBuf::from).collect()
}

fn default_timezone() -> String {
    "Europe/Berlin".to_string()
}

fn default_feed_limit() -> usize {
    crate::feed::MINIMAL_FEED_LIMIT
}

fn default_cache_max_age() -> u64 {
    3600
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedVariantKind {
    #[default]
    Minimal,
    Full,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhenextConfig {
    /// Public base URL, used for links and the feed footer
    #[serde(default = "default_site_url")]
    pub site_url: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Dataset files, tried in order
    #[serde(default = "default_dataset_paths")]
    pub dataset_paths: Vec<PathBuf>,

    /// Dataset URL tried after the files. Defaults to
    /// `<site_url>/data/events.json`; an empty string disables it.
    #[serde(default)]
    pub dataset_url: Option<String>,

    #[serde(default = "default_timezone")]
    pub default_timezone: String,

    #[serde(default)]
    pub feed_variant: FeedVariantKind,

    /// Events emitted by the minimal feed
    #[serde(default = "default_feed_limit")]
    pub feed_limit: usize,

    /// Seconds clients may cache a feed
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age: u64,
}

impl Default for WhenextConfig {
    fn default() -> Self {
        WhenextConfig {
            site_url: default_site_url(),
            host: default_host(),
            port: default_port(),
            dataset_paths: default_dataset_paths(),
            dataset_url: None,
            default_timezone: default_timezone(),
            feed_variant: FeedVariantKind::default(),
            feed_limit: default_feed_limit(),
            cache_max_age: default_cache_max_age(),
        }
    }
}

impl WhenextConfig {
    /// `$WHENEXT_CONFIG`, else `<config dir>/whenext/config.toml`.
    pub fn config_path() -> WhenextResult<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(shellexpand::tilde(&path).into_owned()));
        }

        let config_dir = dirs::config_dir()
            .ok_or_else(|| WhenextError::Config("Could not determine config directory".into()))?
            .join("whenext");

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> WhenextResult<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load with `path` as the config file. A missing file is not an error.
    pub fn load_from(path: &Path) -> WhenextResult<Self> {
        let config: WhenextConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("WHENEXT")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("dataset_paths"),
            )
            .build()
            .map_err(|e| WhenextError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| WhenextError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> WhenextResult<()> {
        if self.site_url.trim().is_empty() {
            return Err(WhenextError::Config("site_url must not be empty".into()));
        }
        self.timezone()?;
        Ok(())
    }

    pub fn timezone(&self) -> WhenextResult<Tz> {
        Tz::from_str(&self.default_timezone).map_err(|_| {
            WhenextError::Config(format!(
                "Unknown default_timezone '{}'",
                self.default_timezone
            ))
        })
    }

    pub fn feed_variant(&self) -> FeedVariant {
        match self.feed_variant {
            FeedVariantKind::Full => FeedVariant::Full,
            FeedVariantKind::Minimal => FeedVariant::Minimal {
                limit: self.feed_limit,
            },
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Configured files first, then the dataset URL.
    pub fn dataset_sources(&self) -> Vec<DatasetSource> {
        let mut sources: Vec<DatasetSource> =
            self.dataset_paths.iter().map(DatasetSource::file).collect();

        let url = match &self.dataset_url {
            Some(url) => url.clone(),
            None => format!("{}/data/events.json", self.site_url.trim_end_matches('/')),
        };
        if !url.trim().is_empty() {
            sources.push(DatasetSource::Url(url));
        }

        sources
    }

    pub fn dataset_loader(&self) -> DatasetLoader {
        DatasetLoader::new(self.dataset_sources())
    }

    pub fn link_generator(&self) -> LinkGenerator {
        LinkGenerator::new(&self.site_url)
    }

    pub fn feed_builder(&self) -> WhenextResult<FeedBuilder> {
        Ok(FeedBuilder::new(&self.site_url)
            .with_variant(self.feed_variant())
            .with_default_timezone(self.timezone()?))
    }

    /// Create a config file with every option commented out.
    pub fn create_default_config(path: &Path) -> WhenextResult<()> {
        let contents = format!(
            "\
# whenext configuration

# Public URL of the site (used in links and feeds):
# site_url = \"{}\"

# Address the server listens on:
# host = \"127.0.0.1\"
# port = 3000

# Event dataset, tried in order (files first, then the URL):
# dataset_paths = [\"data/events.json\", \"public/data/events.json\"]
# dataset_url = \"{}/data/events.json\"

# Timezone hint written into feeds:
# default_timezone = \"Europe/Berlin\"

# \"minimal\" emits the first feed_limit events, \"full\" emits all:
# feed_variant = \"minimal\"
# feed_limit = 10

# Seconds clients may cache a feed:
# cache_max_age = 3600
",
            DEFAULT_SITE_URL, DEFAULT_SITE_URL
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                WhenextError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| WhenextError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
