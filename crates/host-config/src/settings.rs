//! Settings for host configuration resolution, from environment or TOML

use crate::aws::BASE_URL;
use crate::error::{HostConfigError, Result};
use std::time::Duration;

/// Environment variable selecting the host provider.
pub const ENV_PROVIDER: &str = "WORKER_HOST_PROVIDER";
/// Environment variable overriding the metadata service base URL.
pub const ENV_METADATA_URL: &str = "WORKER_HOST_METADATA_URL";
/// Environment variable with the per-request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "WORKER_HOST_TIMEOUT_SECS";

const DEFAULT_PROVIDER: &str = "aws";
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// How to reach the host's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSettings {
    /// Registered provider name (e.g. "aws")
    pub provider: String,
    /// Metadata service base URL, without trailing slash
    pub metadata_url: String,
    /// Per-request timeout for metadata fetches
    pub timeout: Duration,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            metadata_url: BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl HostSettings {
    /// Read settings from the process environment.
    ///
    /// Unset variables fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `HostConfigError::Config` if `WORKER_HOST_TIMEOUT_SECS` is not a
    /// positive integer.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<L>(lookup: L) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(provider) = lookup(ENV_PROVIDER).filter(|v| !v.trim().is_empty()) {
            settings.provider = provider.trim().to_string();
        }
        if let Some(url) = lookup(ENV_METADATA_URL).filter(|v| !v.trim().is_empty()) {
            settings.metadata_url = normalize_url(&url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|e| HostConfigError::Config {
                message: format!("{ENV_TIMEOUT_SECS}={raw:?} is not a number of seconds: {e}"),
            })?;
            settings.timeout = timeout_from_secs(secs)?;
        }

        Ok(settings)
    }

    /// Parse settings from a TOML table
    ///
    /// # Arguments
    ///
    /// * `table` - The `[host]` section of the worker's config file
    ///
    /// # Errors
    ///
    /// Returns `HostConfigError::Config` if `timeout_secs` is not a positive
    /// integer
    pub fn from_toml(table: &toml::Table) -> Result<Self> {
        let provider = table
            .get("provider")
            .and_then(|v| v.as_str())
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());

        let metadata_url = table
            .get("metadata_url")
            .and_then(|v| v.as_str())
            .filter(|v| !v.trim().is_empty())
            .map(normalize_url)
            .unwrap_or_else(|| BASE_URL.to_string());

        let timeout = match table.get("timeout_secs") {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(toml::Value::Integer(secs)) if *secs > 0 => Duration::from_secs(*secs as u64),
            Some(toml::Value::Integer(secs)) => {
                return Err(HostConfigError::Config {
                    message: format!("timeout_secs must be positive, got {secs}"),
                });
            }
            Some(other) => {
                return Err(HostConfigError::Config {
                    message: format!(
                        "timeout_secs must be an integer number of seconds, got {} {other}",
                        other.type_str()
                    ),
                });
            }
        };

        Ok(Self {
            provider,
            metadata_url,
            timeout,
        })
    }
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn timeout_from_secs(secs: u64) -> Result<Duration> {
    if secs == 0 {
        return Err(HostConfigError::Config {
            message: format!("{ENV_TIMEOUT_SECS} must be positive"),
        });
    }
    Ok(Duration::from_secs(secs))
}
