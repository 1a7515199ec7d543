//! Mock host provider for testing

use crate::config::{ResolvedConfig, ShutdownPolicy};
use crate::error::{HostConfigError, Result};
use crate::metadata::MetadataField;
use crate::provider::HostProvider;
use std::sync::{Arc, Mutex};

/// Mock host provider for testing. Returns canned data.
#[derive(Debug, Clone)]
pub struct MockHost {
    /// Configuration returned from configure
    pub config: ResolvedConfig,
    /// Billing cycle length reported
    pub interval_secs: u64,
    /// Uptime reported
    pub uptime_secs: u64,
    /// Termination text returned
    pub termination: String,
    /// If set, async methods return this error
    pub error: Option<String>,
    /// Track calls for verification
    pub call_log: Arc<Mutex<Vec<MockCall>>>,
}

/// Record of method calls for test assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockCall {
    Configure,
    BillingCycleInterval,
    BillingCycleUptime,
    TerminationTime,
}

impl MockHost {
    /// Create a mock host with an empty base layer
    pub fn new() -> Self {
        Self::with_config(ResolvedConfig::base(
            std::iter::empty::<(MetadataField, &str)>(),
            "mock-provisioner",
            ShutdownPolicy::default(),
        ))
    }

    /// Create a mock host returning `config`
    pub fn with_config(config: ResolvedConfig) -> Self {
        Self {
            config,
            interval_secs: 3600,
            uptime_secs: 0,
            termination: String::new(),
            error: None,
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the termination text
    pub fn with_termination(mut self, text: impl Into<String>) -> Self {
        self.termination = text.into();
        self
    }

    /// Set the reported uptime
    pub fn with_uptime(mut self, secs: u64) -> Self {
        self.uptime_secs = secs;
        self
    }

    /// Set the error that async methods should return
    pub fn with_error(mut self, error: String) -> Self {
        self.error = Some(error);
        self
    }

    /// Get a copy of the call log for assertions
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Clear the call log
    pub fn clear_calls(&self) {
        self.call_log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    fn log_call(&self, call: MockCall) {
        self.call_log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
    }

    fn check_error(&self) -> Result<()> {
        match &self.error {
            Some(message) => Err(HostConfigError::Provider {
                message: message.clone(),
                source: None,
            }),
            None => Ok(()),
        }
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostProvider for MockHost {
    async fn configure(&self) -> Result<ResolvedConfig> {
        self.log_call(MockCall::Configure);
        self.check_error()?;
        Ok(self.config.clone())
    }

    fn billing_cycle_interval(&self) -> u64 {
        self.log_call(MockCall::BillingCycleInterval);
        self.interval_secs
    }

    fn billing_cycle_uptime(&self) -> u64 {
        self.log_call(MockCall::BillingCycleUptime);
        self.uptime_secs
    }

    async fn termination_time(&self) -> Result<String> {
        self.log_call(MockCall::TerminationTime);
        self.check_error()?;
        Ok(self.termination.clone())
    }

    fn provider_name(&self) -> &str {
        "MockHost"
    }
}
