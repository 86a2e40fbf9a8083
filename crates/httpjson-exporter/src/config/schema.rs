use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use httpjson_core::error::{ExporterError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub version: u32,

    #[serde(default)]
    pub web: WebSection,

    #[serde(default)]
    pub target: TargetSection,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            version: 1,
            web: WebSection::default(),
            target: TargetSection::default(),
        }
    }
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ExporterError::UnsupportedVersion);
        }

        self.web.validate()?;
        self.target.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_telemetry_path")]
    pub telemetry_path: String,
}

impl Default for WebSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            telemetry_path: default_telemetry_path(),
        }
    }
}

impl WebSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !self.telemetry_path.starts_with('/') || self.telemetry_path == "/" {
            return Err(ExporterError::BadConfig(
                "web.telemetry_path must start with '/' and must not be '/'".into(),
            ));
        }
        if self.telemetry_path == "/healthz" {
            return Err(ExporterError::BadConfig(
                "web.telemetry_path must not shadow /healthz".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            ExporterError::BadConfig(format!("web.listen must be a valid SocketAddr: {e}"))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetSection {
    #[serde(default = "default_scrape_uri")]
    pub scrape_uri: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for TargetSection {
    fn default() -> Self {
        Self {
            scrape_uri: default_scrape_uri(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl TargetSection {
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.scrape_uri).map_err(|e| {
            ExporterError::BadConfig(format!("target.scrape_uri is not a valid URL: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ExporterError::BadConfig(
                "target.scrape_uri must be an http(s) URL".into(),
            ));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(ExporterError::BadConfig(
                "target.scrape_uri must include a host".into(),
            ));
        }
        if !(1..=600000).contains(&self.timeout_ms) {
            return Err(ExporterError::BadConfig(
                "target.timeout_ms must be between 1 and 600000".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_listen() -> String {
    "0.0.0.0:9101".into()
}
fn default_telemetry_path() -> String {
    "/metrics".into()
}
fn default_scrape_uri() -> String {
    "http://localhost/metrics".into()
}
fn default_timeout_ms() -> u64 {
    5000
}
