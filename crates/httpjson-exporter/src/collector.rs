//! Scrape-cycle orchestration.
//!
//! One cycle = fetch, parse, flatten, publish. Cycles are serialized by an
//! async mutex held for the whole cycle (and for rendering, when the caller
//! asks for a snapshot), so concurrent pulls never see a mix of two cycles'
//! writes. Fetch and parse failures only flip `up` to 0; previously published
//! values stay in place.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tokio::sync::Mutex;

use httpjson_core::error::{FlattenFault, ParseError, ScrapeError};
use httpjson_core::flatten::{flatten, FlatPair};

use crate::fetch::Fetch;
use crate::obs::ExporterMetrics;

/// Result of one scrape cycle.
#[derive(Debug)]
pub struct CycleOutcome {
    pub success: bool,
    /// Pairs published by this cycle (empty on failure).
    pub pairs: Vec<FlatPair>,
    pub error: Option<ScrapeError>,
}

pub struct Collector {
    url: String,
    fetcher: Arc<dyn Fetch>,
    metrics: ExporterMetrics,
    cycle: Mutex<()>,
}

impl Collector {
    pub fn new(fetcher: Arc<dyn Fetch>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fetcher,
            metrics: ExporterMetrics::default(),
            cycle: Mutex::new(()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn metrics(&self) -> &ExporterMetrics {
        &self.metrics
    }

    /// Run one cycle, waiting for any cycle already in flight.
    pub async fn scrape(&self) -> CycleOutcome {
        let _guard = self.cycle.lock().await;
        self.run_cycle().await
    }

    /// Run one cycle and render the exposition text before releasing the lock.
    pub async fn scrape_and_render(&self) -> String {
        let _guard = self.cycle.lock().await;
        self.run_cycle().await;
        self.metrics.render()
    }

    async fn run_cycle(&self) -> CycleOutcome {
        let started = Instant::now();

        // The only await point is the fetch; everything after it runs without
        // yielding, so a dropped request future cannot leave a half-written store.
        let outcome = match self.fetch_and_flatten().await {
            Ok(pairs) => {
                for p in &pairs {
                    tracing::trace!(path = %p.path, value = p.value, "publish");
                    self.metrics.value.set(&[("path", p.path.as_str())], p.value);
                }
                self.metrics.up.set(1.0);
                tracing::debug!(url = %self.url, pairs = pairs.len(), "scrape ok");
                CycleOutcome { success: true, pairs, error: None }
            }
            Err(e) => {
                tracing::warn!(url = %self.url, kind = e.kind(), error = %e, "scrape failed");
                self.metrics.scrape_errors.inc(&[("kind", e.kind())]);
                self.metrics.up.set(0.0);
                CycleOutcome { success: false, pairs: Vec::new(), error: Some(e) }
            }
        };

        self.metrics
            .last_scrape_duration
            .set(started.elapsed().as_secs_f64());
        outcome
    }

    async fn fetch_and_flatten(&self) -> Result<Vec<FlatPair>, ScrapeError> {
        let body = self.fetcher.fetch(&self.url).await?;
        let doc: Value = serde_json::from_slice(&body).map_err(ParseError::from)?;

        match flatten(&doc).collect::<Result<Vec<_>, _>>() {
            Ok(pairs) => Ok(pairs),
            Err(fault) => flatten_fault(fault),
        }
    }
}

/// Parser output outside its own domain: a defect, not a bad scrape.
fn flatten_fault(fault: FlattenFault) -> ! {
    tracing::error!(path = %fault.path, error = %fault, "aborting on internal flatten fault");
    std::process::abort()
}
