use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },

    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Supplier of the raw bracket page for a tax year.
///
/// The whole page is returned at once; extraction never starts on a partial
/// body.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Human-readable origin of the page for `year` (a URL or a file path),
    /// used in log lines and error context.
    fn location(&self, year: i32) -> String;

    async fn fetch_page(&self, year: i32) -> Result<String, FetchError>;
}
