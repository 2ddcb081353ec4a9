use std::sync::Arc;

use whenext_core::config::WhenextConfig;
use whenext_core::dataset::DatasetLoader;
use whenext_core::feed::FeedBuilder;
use whenext_core::links::LinkGenerator;
use whenext_core::{Event, WhenextResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    config: WhenextConfig,
    // The dataset is re-read on each request to pick up changes
    loader: DatasetLoader,
    feed_builder: FeedBuilder,
    links: LinkGenerator,
}

impl AppState {
    pub fn new(config: WhenextConfig) -> WhenextResult<Self> {
        let feed_builder = config.feed_builder()?;
        let loader = config.dataset_loader();
        let links = config.link_generator();

        Ok(AppState {
            inner: Arc::new(Inner {
                config,
                loader,
                feed_builder,
                links,
            }),
        })
    }

    pub fn config(&self) -> &WhenextConfig {
        &self.inner.config
    }

    pub fn feed_builder(&self) -> &FeedBuilder {
        &self.inner.feed_builder
    }

    pub fn links(&self) -> &LinkGenerator {
        &self.inner.links
    }

    pub async fn events(&self) -> WhenextResult<Vec<Event>> {
        self.inner.loader.load().await
    }
}
