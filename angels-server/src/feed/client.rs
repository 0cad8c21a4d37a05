//! Live station map API client.

use tracing::debug;

use super::error::FetchError;
use super::source::SnapshotSource;

/// Default station map feed (Citi Bike, New York).
const DEFAULT_URL: &str = "https://layer.bicyclesharing.net/map/v1/nyc/stations";

/// Configuration for the HTTP source.
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    /// Feed URL
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl HttpSourceConfig {
    /// Create a config pointing at the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: 30,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

/// Fetches the snapshot from the live station map API.
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: reqwest::Client,
    url: String,
}

impl HttpSource {
    /// Create a new HTTP source.
    pub fn new(config: HttpSourceConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
        })
    }

    /// The feed URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SnapshotSource for HttpSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        debug!(url = %self.url, "fetching station snapshot");

        let response = self.http.get(&self.url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}
