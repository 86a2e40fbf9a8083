//! Shared error types across httpjson crates.

use thiserror::Error;

/// Failure of the single bounded GET against the scrape target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("scrape target timed out")]
    Timeout,
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected status code {0}")]
    BadStatus(u16),
    #[error("reading response body failed: {0}")]
    ReadFailed(String),
}

/// The scrape target answered, but the body is not valid JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid json at line {line} column {column}: {cause}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub cause: String,
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        Self {
            line: e.line(),
            column: e.column(),
            cause: e.to_string(),
        }
    }
}

/// A numeric leaf the parser accepted but could not hand over as `f64`.
///
/// Unreachable for anything `serde_json` produces without
/// `arbitrary_precision`; seeing it means the parser's output domain changed
/// underneath us.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("internal flatten fault at {path}: numeric leaf is not representable as f64")]
pub struct FlattenFault {
    pub path: String,
}

/// Recoverable failure of one scrape cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ScrapeError {
    /// Stable short label, used as the `kind` label on the error counter.
    pub fn kind(&self) -> &'static str {
        match self {
            ScrapeError::Fetch(FetchError::Timeout) => "timeout",
            ScrapeError::Fetch(FetchError::Connect(_)) => "connect",
            ScrapeError::Fetch(FetchError::Request(_)) => "request",
            ScrapeError::Fetch(FetchError::BadStatus(_)) => "bad_status",
            ScrapeError::Fetch(FetchError::ReadFailed(_)) => "read",
            ScrapeError::Parse(_) => "parse",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Startup and configuration errors.
#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("io: {0}")]
    Io(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}
