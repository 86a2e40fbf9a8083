//! Shared application state for the exporter.
//!
//! Built once at startup and cloned into every axum handler.

use std::sync::Arc;

use httpjson_core::error::Result;

use crate::collector::Collector;
use crate::config::ExporterConfig;
use crate::fetch::{Fetch, HttpFetcher};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    collector: Arc<Collector>,
}

struct AppStateInner {
    cfg: ExporterConfig,
}

impl AppState {
    /// Build application state with the real HTTP fetcher.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: ExporterConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(cfg.target.timeout())?;
        Ok(Self::with_fetcher(cfg, Arc::new(fetcher)))
    }

    /// Build application state around any fetcher.
    pub fn with_fetcher(cfg: ExporterConfig, fetcher: Arc<dyn Fetch>) -> Self {
        let collector = Arc::new(Collector::new(fetcher, cfg.target.scrape_uri.clone()));
        Self {
            inner: Arc::new(AppStateInner { cfg }),
            collector,
        }
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.inner.cfg
    }

    pub fn collector(&self) -> Arc<Collector> {
        Arc::clone(&self.collector)
    }
}
