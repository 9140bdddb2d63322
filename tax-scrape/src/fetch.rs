//! [`PageSource`] implementations: live HTTP and saved files.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tax_core::{FetchError, PageSource, SourceConfig};
use tracing::{debug, info};

/// Fetches the bracket page over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
    config: SourceConfig,
}

impl HttpPageSource {
    /// Builds a client carrying the configured user agent and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the TLS backend cannot be initialised.
    pub fn new(config: SourceConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    fn location(&self, year: i32) -> String {
        self.config.url_for(year)
    }

    async fn fetch_page(&self, year: i32) -> Result<String, FetchError> {
        let url = self.location(year);
        info!(%url, "fetching bracket page");

        let request_error = |e: reqwest::Error| FetchError::Request {
            url: url.clone(),
            message: e.to_string(),
        };

        let response = self.client.get(&url).send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(request_error)?;
        debug!(%url, bytes = body.len(), "received bracket page");
        Ok(body)
    }
}

/// Reads a previously saved page. The year is ignored.
#[derive(Debug, Clone)]
pub struct FilePageSource {
    path: PathBuf,
}

impl FilePageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PageSource for FilePageSource {
    fn location(&self, _year: i32) -> String {
        self.path.display().to_string()
    }

    async fn fetch_page(&self, year: i32) -> Result<String, FetchError> {
        info!(path = %self.path.display(), year, "reading saved bracket page");

        std::fs::read_to_string(&self.path).map_err(|e| FetchError::Io {
            path: self.location(year),
            message: e.to_string(),
        })
    }
}
