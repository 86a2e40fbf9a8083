//! httpjson exporter library entry.
//!
//! This crate wires configuration, the bounded fetcher, the scrape collector
//! and the metrics registry into an axum service. It is intended to be
//! consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod collector;
pub mod config;
pub mod fetch;
pub mod obs;
pub mod ops;
pub mod router;
