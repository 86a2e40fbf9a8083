//! httpjson core: the JSON-to-metric flattener and the shared error surface.
//!
//! This crate turns an arbitrary JSON document into `(path, f64)` pairs and
//! defines the error taxonomy used by the exporter. It intentionally carries no
//! transport or runtime dependencies so it can be reused in other contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Fallible paths surface as typed errors so a hostile or malformed scrape
//! target cannot take the exporter down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod flatten;

/// Shared result type.
pub use error::{ExporterError, Result};
pub use flatten::{flatten, flatten_to_map, FlatPair, Flatten};
