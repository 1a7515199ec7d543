//! In-memory fetcher and uptime doubles for testing

use crate::error::{HostConfigError, Result};
use crate::fetch::TextFetcher;
use crate::uptime::UptimeReader;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned response for one URL
#[derive(Debug, Clone, PartialEq)]
pub enum MockResponse {
    /// 2xx with this body
    Text(String),
    /// Non-success status; fetches yield empty text
    Status(u16),
    /// Connection-level failure with this message
    TransportError(String),
}

/// `TextFetcher` serving canned responses keyed by full URL.
///
/// Unknown URLs behave like a 404.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    responses: HashMap<String, MockResponse>,
    latency: Option<Duration>,
    /// Every URL requested, in request order
    pub request_log: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with a 200 for `url`
    pub fn with_text(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses
            .insert(url.into(), MockResponse::Text(body.into()));
        self
    }

    /// Answer `url` with a non-success status
    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), MockResponse::Status(status));
        self
    }

    /// Fail `url` at the transport level
    pub fn with_transport_error(mut self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses
            .insert(url.into(), MockResponse::TransportError(message.into()));
        self
    }

    /// Delay every response by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Get a copy of the request log for assertions
    pub fn requests(&self) -> Vec<String> {
        self.request_log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn log_request(&self, url: &str) {
        self.request_log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(url.to_string());
    }
}

impl TextFetcher for MockFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.log_request(url);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match self.responses.get(url) {
            Some(MockResponse::Text(body)) => Ok(body.clone()),
            Some(MockResponse::Status(_)) | None => Ok(String::new()),
            Some(MockResponse::TransportError(message)) => Err(HostConfigError::transport(
                url,
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, message.clone()),
            )),
        }
    }
}

/// `UptimeReader` that always reports the same value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedUptime(pub u64);

impl UptimeReader for FixedUptime {
    fn uptime_secs(&self) -> u64 {
        self.0
    }
}
