//! Exporter config loader (strict parsing).

pub mod schema;

use std::fs;

use httpjson_core::error::{ExporterError, Result};

pub use schema::{ExporterConfig, TargetSection, WebSection};

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let cfg = parse_str(s)?;
    cfg.validate()?;
    Ok(cfg)
}

fn parse_file(path: &str) -> Result<ExporterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ExporterError::Io(format!("read config {path} failed: {e}")))?;
    parse_str(&s)
}

fn parse_str(s: &str) -> Result<ExporterConfig> {
    serde_yaml::from_str(s).map_err(|e| ExporterError::BadConfig(format!("invalid yaml: {e}")))
}

/// Command-line overrides; mirror the classic exporter flag names.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub listen: Option<String>,
    pub telemetry_path: Option<String>,
    pub scrape_uri: Option<String>,
    pub timeout_ms: Option<u64>,
}

/// Resolve the effective config: file (or defaults), then overrides, then validation.
pub fn resolve(path: Option<&str>, overrides: Overrides) -> Result<ExporterConfig> {
    let mut cfg = match path {
        Some(p) => parse_file(p)?,
        None => ExporterConfig::default(),
    };

    if let Some(v) = overrides.listen {
        cfg.web.listen = v;
    }
    if let Some(v) = overrides.telemetry_path {
        cfg.web.telemetry_path = v;
    }
    if let Some(v) = overrides.scrape_uri {
        cfg.target.scrape_uri = v;
    }
    if let Some(v) = overrides.timeout_ms {
        cfg.target.timeout_ms = v;
    }

    cfg.validate()?;
    Ok(cfg)
}
