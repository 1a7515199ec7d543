//! Provider registry for runtime registration of host providers

use crate::aws::AwsHost;
use crate::error::{HostConfigError, Result};
use crate::provider::ErasedHostProvider;
use crate::settings::HostSettings;
use std::collections::HashMap;
use std::sync::Arc;

/// A factory function that creates a host provider instance
pub type FactoryFn =
    Arc<dyn Fn(&HostSettings) -> Result<Box<dyn ErasedHostProvider>> + Send + Sync>;

/// A factory that can create a host provider instance
#[derive(Clone)]
pub struct HostFactory {
    /// Provider name (e.g., "aws")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Factory function: takes settings, returns a provider
    pub create: FactoryFn,
}

impl std::fmt::Debug for HostFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostFactory")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("create", &"<factory_fn>")
            .finish()
    }
}

/// Registry for host providers
#[derive(Debug, Clone)]
pub struct HostRegistry {
    /// Factory functions keyed by provider name
    factories: HashMap<String, HostFactory>,
}

impl HostRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry with the built-in providers registered
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(HostFactory {
            name: "aws".to_string(),
            description: "EC2 instance metadata and user-data".to_string(),
            create: Arc::new(
                |settings: &HostSettings| -> Result<Box<dyn ErasedHostProvider>> {
                    Ok(Box::new(AwsHost::from_settings(settings)?))
                },
            ),
        });
        registry
    }

    /// Register a provider factory
    ///
    /// If a factory with the same name already exists, it will be replaced.
    pub fn register(&mut self, factory: HostFactory) {
        self.factories.insert(factory.name.clone(), factory);
    }

    /// Create a provider by name
    ///
    /// # Errors
    ///
    /// Returns `HostConfigError::Provider` if the provider is not registered,
    /// or the factory's error if creation fails.
    pub fn create_provider(
        &self,
        name: &str,
        settings: &HostSettings,
    ) -> Result<Box<dyn ErasedHostProvider>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| HostConfigError::Provider {
                message: format!("Host provider '{name}' not registered"),
                source: None,
            })?;

        (factory.create)(settings)
    }

    /// List registered provider names
    pub fn list_providers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Check if a provider is registered
    pub fn has_provider(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for HostRegistry {
    fn default() -> Self {
        Self::new()
    }
}
