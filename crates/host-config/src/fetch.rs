//! Text fetching over HTTP
//!
//! Metadata endpoints legitimately return 404 until a value exists (spot
//! termination time is the usual example), so a non-success status is read as
//! empty text rather than an error.

use crate::error::{HostConfigError, Result};
use std::future::Future;
use std::time::Duration;
use tracing::trace;

/// Fetches a URL and returns its body as text.
///
/// Uses RPITIT (Return Position Impl Trait in Traits) with explicit Send bounds.
pub trait TextFetcher: Send + Sync + std::fmt::Debug {
    /// GET `url`. Non-success statuses yield `Ok(String::new())`.
    fn fetch_text(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// `TextFetcher` backed by a `reqwest` client with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpTextFetcher {
    client: reqwest::Client,
}

impl HttpTextFetcher {
    /// Create a fetcher whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `HostConfigError::Config` if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HostConfigError::Config {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl TextFetcher for HttpTextFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HostConfigError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            trace!(url, status = status.as_u16(), "non-success status, treating as empty");
            return Ok(String::new());
        }

        response
            .text()
            .await
            .map_err(|e| HostConfigError::transport(url, e))
    }
}
