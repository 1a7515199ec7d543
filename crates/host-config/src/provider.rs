//! Provider trait for host configuration across cloud platforms

use crate::config::ResolvedConfig;
use crate::error::Result;
use std::future::Future;
use std::pin::Pin;

/// Host configuration capability set.
///
/// Each cloud host (AWS, etc.) implements this trait.
/// Uses RPITIT (Return Position Impl Trait in Traits) with explicit Send bounds.
pub trait HostProvider: Send + Sync + std::fmt::Debug {
    /// Build a fresh configuration snapshot for this worker
    fn configure(&self) -> impl Future<Output = Result<ResolvedConfig>> + Send;

    /// Length of the provider's billing cycle in seconds
    fn billing_cycle_interval(&self) -> u64;

    /// Seconds this host has been running
    fn billing_cycle_uptime(&self) -> u64;

    /// Raw termination notice text; empty when none is scheduled
    fn termination_time(&self) -> impl Future<Output = Result<String>> + Send;

    /// Provider name for logging/display
    fn provider_name(&self) -> &str;
}

/// Object-safe version of HostProvider for type erasure.
///
/// Implemented automatically for all types that implement HostProvider, so the
/// registry can hand out `Box<dyn ErasedHostProvider>`.
pub trait ErasedHostProvider: Send + Sync + std::fmt::Debug {
    fn configure<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<ResolvedConfig>> + Send + 'a>>;

    fn billing_cycle_interval(&self) -> u64;

    fn billing_cycle_uptime(&self) -> u64;

    fn termination_time<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

    fn provider_name(&self) -> &str;
}

/// Blanket implementation of ErasedHostProvider for all HostProvider types.
impl<T: HostProvider> ErasedHostProvider for T {
    fn configure<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<ResolvedConfig>> + Send + 'a>> {
        Box::pin(HostProvider::configure(self))
    }

    fn billing_cycle_interval(&self) -> u64 {
        HostProvider::billing_cycle_interval(self)
    }

    fn billing_cycle_uptime(&self) -> u64 {
        HostProvider::billing_cycle_uptime(self)
    }

    fn termination_time<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(HostProvider::termination_time(self))
    }

    fn provider_name(&self) -> &str {
        HostProvider::provider_name(self)
    }
}
