//! Top-level facade crate for httpjson.
//!
//! Re-exports the flattener core and the exporter library so users can depend on a single crate.

pub mod core {
    pub use httpjson_core::*;
}

pub mod exporter {
    pub use httpjson_exporter::*;
}
