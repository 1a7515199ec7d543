//! Worker host configuration for cloud compute nodes
//!
//! This crate answers one question at worker startup: which host, identity and
//! shutdown policy should this process use? It reads identity and placement
//! facts from the node's local metadata service, applies host defaults, and
//! layers operator-supplied user-data overrides on top.
//!
//! Host variants implement [`HostProvider`]; [`AwsHost`] is the built-in one.
//! Bootstrap code usually only needs [`resolve_host_config`].

pub mod aws;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod metadata;
pub mod mock_fetcher;
pub mod mock_provider;
pub mod provider;
pub mod registry;
pub mod settings;
pub mod uptime;

pub use aws::AwsHost;
pub use config::{ResolvedConfig, ShutdownPolicy};
pub use error::{HostConfigError, Result};
pub use fetch::{HttpTextFetcher, TextFetcher};
pub use metadata::MetadataField;
pub use mock_fetcher::{FixedUptime, MockFetcher, MockResponse};
pub use mock_provider::{MockCall, MockHost};
pub use provider::{ErasedHostProvider, HostProvider};
pub use registry::{HostFactory, HostRegistry};
pub use settings::HostSettings;
pub use uptime::{SystemUptime, UptimeReader};

use tracing::debug;

/// Resolve the worker configuration for the provider named in `settings`.
///
/// Builds the built-in registry, creates the provider and runs its
/// `configure` step once.
///
/// # Errors
///
/// Returns `HostConfigError::Provider` if the provider is not registered, or
/// whatever the provider's `configure` step surfaces.
pub async fn resolve_host_config(settings: &HostSettings) -> Result<ResolvedConfig> {
    let registry = HostRegistry::with_builtin();
    let provider = registry.create_provider(&settings.provider, settings)?;
    debug!(provider = provider.provider_name(), "resolving host configuration");
    provider.configure().await
}
