//! AWS host provider
//!
//! Reads identity and placement from the EC2 instance metadata service and
//! applies provisioner overrides from instance user-data.
//!
//! See <http://docs.aws.amazon.com/AWSEC2/latest/UserGuide/AESDG-chapter-instancedata.html>

use crate::config::{AWS_PROVISIONER_ID, ResolvedConfig, ShutdownPolicy, minutes};
use crate::error::Result;
use crate::fetch::{HttpTextFetcher, TextFetcher};
use crate::metadata::MetadataField;
use crate::provider::HostProvider;
use crate::settings::HostSettings;
use crate::uptime::{SystemUptime, UptimeReader};
use tracing::{debug, info, warn};

/// EC2 metadata service endpoint.
pub const BASE_URL: &str = "http://169.254.169.254/latest";

/// EC2 bills per hour.
pub const BILLING_CYCLE_SECS: u64 = minutes(60);

/// Host provider for EC2 nodes.
#[derive(Debug, Clone)]
pub struct AwsHost<F = HttpTextFetcher, U = SystemUptime> {
    base_url: String,
    fetcher: F,
    uptime: U,
}

impl AwsHost {
    /// Create an AWS host talking to `settings.metadata_url` over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `HostConfigError::Config` if the HTTP client cannot be built.
    pub fn from_settings(settings: &HostSettings) -> Result<Self> {
        let fetcher = HttpTextFetcher::new(settings.timeout)?;
        Ok(AwsHost::new(fetcher, SystemUptime).with_base_url(&settings.metadata_url))
    }
}

impl<F: TextFetcher, U: UptimeReader> AwsHost<F, U> {
    /// Create a provider against the default metadata endpoint.
    pub fn new(fetcher: F, uptime: U) -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            fetcher,
            uptime,
        }
    }

    /// Point the provider at a different metadata endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Read metadata and user-data from `base_url` (or the configured
    /// endpoint) and build a configuration snapshot.
    ///
    /// The five metadata fields and the user-data document are fetched
    /// concurrently. User-data overrides replace base values key by key.
    ///
    /// # Errors
    ///
    /// - `Transport` if `host`, `workerId` or user-data cannot be fetched
    /// - `OverrideParse` if user-data is not JSON
    /// - `OverrideNotObject` if user-data is a JSON array or string
    pub async fn resolve(&self, base_url: Option<&str>) -> Result<ResolvedConfig> {
        let base = base_url
            .map(|url| url.trim_end_matches('/'))
            .unwrap_or(self.base_url.as_str());
        info!(url = base, "configure");

        let user_data_url = format!("{base}/user-data");
        let (host, worker_id, worker_type, worker_group, worker_node_type, user_data) = tokio::join!(
            self.fetch_field(base, MetadataField::Host),
            self.fetch_field(base, MetadataField::WorkerId),
            self.fetch_field(base, MetadataField::WorkerType),
            self.fetch_field(base, MetadataField::WorkerGroup),
            self.fetch_field(base, MetadataField::WorkerNodeType),
            self.fetcher.fetch_text(&user_data_url),
        );

        let metadata = [
            (MetadataField::Host, host?),
            (MetadataField::WorkerId, worker_id?),
            (MetadataField::WorkerType, worker_type?),
            (MetadataField::WorkerGroup, worker_group?),
            (MetadataField::WorkerNodeType, worker_node_type?),
        ];
        let config = ResolvedConfig::base(
            metadata.iter().map(|(field, text)| (*field, text.as_str())),
            AWS_PROVISIONER_ID,
            ShutdownPolicy::default(),
        );
        debug!(?config, "metadata");

        let user_data = user_data?;
        if user_data.is_empty() {
            info!("userdata not available");
            return Ok(config);
        }

        debug!(text = %user_data, "read userdata");
        let config = config.merge_user_data(&user_data)?;

        info!(
            worker_id = config.worker_id().unwrap_or_default(),
            worker_type = config.worker_type().unwrap_or_default(),
            keys = config.len(),
            "final config"
        );
        debug!(?config, "final config");
        Ok(config)
    }

    /// Read the spot termination notice from `base_url` (or the configured
    /// endpoint).
    ///
    /// Empty until the node is scheduled for reclaim. Transport failures are
    /// logged and reported as empty.
    pub async fn termination_time_at(&self, base_url: Option<&str>) -> Result<String> {
        let base = base_url
            .map(|url| url.trim_end_matches('/'))
            .unwrap_or(self.base_url.as_str());
        let url = format!("{base}/meta-data/spot/termination-time");

        match self.fetcher.fetch_text(&url).await {
            Ok(text) => Ok(text),
            Err(e) if e.is_transport() => {
                warn!(url = %url, error = %e, "termination-time fetch failed, assuming none");
                Ok(String::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch_field(&self, base: &str, field: MetadataField) -> Result<String> {
        let url = field.url(base);
        match self.fetcher.fetch_text(&url).await {
            Ok(text) => Ok(text),
            Err(e) if field.is_identity() => Err(e),
            Err(e) => {
                warn!(
                    field = field.config_key(),
                    url = %url,
                    error = %e,
                    "metadata fetch failed, using empty value"
                );
                Ok(String::new())
            }
        }
    }
}

impl<F: TextFetcher, U: UptimeReader> HostProvider for AwsHost<F, U> {
    async fn configure(&self) -> Result<ResolvedConfig> {
        self.resolve(None).await
    }

    fn billing_cycle_interval(&self) -> u64 {
        BILLING_CYCLE_SECS
    }

    fn billing_cycle_uptime(&self) -> u64 {
        self.uptime.uptime_secs()
    }

    async fn termination_time(&self) -> Result<String> {
        self.termination_time_at(None).await
    }

    fn provider_name(&self) -> &str {
        "aws"
    }
}
