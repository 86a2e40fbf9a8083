//! Lightweight in-process metrics.
//!
//! The exporter renders its own Prometheus text exposition: metrics are stored
//! as atomics and rendered by the telemetry handler after each scrape cycle.

pub mod metrics;

pub use metrics::{ExporterMetrics, NAMESPACE};
