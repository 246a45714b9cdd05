/// Unified error handling module
use thiserror::Error;

/// Failure of a single feed fetch attempt.
///
/// Every variant is terminal for that attempt: nothing is retried and the
/// previously applied data stays in place.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Feed request failed: {0}")]
    Fetch(#[source] reqwest::Error),

    #[error("Feed {url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("Feed body is not a valid GeoJSON collection: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("HTTP client could not be built: {0}")]
    Client(#[source] reqwest::Error),
}

impl FeedError {
    /// Stable error code for the presentation layer
    pub fn code(&self) -> &'static str {
        match self {
            FeedError::Status { status, .. } => match status {
                403 => "UPSTREAM_403",
                404 => "UPSTREAM_404",
                429 => "UPSTREAM_429",
                500..=599 => "UPSTREAM_5XX",
                _ => "UPSTREAM_ERROR",
            },
            FeedError::Fetch(_) => "UPSTREAM_ERROR",
            FeedError::Parse(_) => "PARSE_ERROR",
            FeedError::Client(_) => "CLIENT_ERROR",
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        FeedError::Fetch(err)
    }
}

/// Type alias for feed results
pub type FeedResult<T> = Result<T, FeedError>;
