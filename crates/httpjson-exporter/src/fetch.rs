//! Bounded HTTP fetch of the scrape target.
//!
//! One GET per call, no retries. The deadline covers dial, headers and the
//! full body read, so a target that trickles bytes after connecting is cut off
//! just like one that never answers.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use httpjson_core::error::{ExporterError, FetchError, Result};

/// Source of raw scrape bodies. The collector only talks to this seam.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<Bytes, FetchError>;
}

/// `reqwest`-backed fetcher with a combined connect+read deadline.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| ExporterError::Internal(format!("http client build failed: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<Bytes, FetchError> {
        let resp = self.client.get(url).send().await.map_err(request_error)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        let body = resp.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::ReadFailed(e.to_string())
            }
        })?;

        tracing::debug!(url, status = status.as_u16(), len = body.len(), "scrape target fetched");
        Ok(body)
    }
}

fn request_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Connect(e.to_string())
    } else {
        FetchError::Request(e.to_string())
    }
}
