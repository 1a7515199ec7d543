//! Resolved worker configuration and its shutdown policy

use crate::error::{HostConfigError, Result};
use crate::metadata::MetadataField;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Provisioner identifier reported by the AWS host.
pub const AWS_PROVISIONER_ID: &str = "aws-provisioner";

/// Key of the provisioner identifier in the resolved configuration.
pub const PROVISIONER_ID_KEY: &str = "provisionerId";

/// Key of the shutdown policy in the resolved configuration.
pub const SHUTDOWN_KEY: &str = "shutdown";

/// Convert minutes to seconds.
pub const fn minutes(n: u64) -> u64 {
    n * 60
}

/// When the worker may shut its node down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShutdownPolicy {
    pub enabled: bool,
    /// Minimum seconds the node stays up in a billing cycle before shutting down
    pub minimum_cycle_seconds: u64,
}

impl Default for ShutdownPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            minimum_cycle_seconds: minutes(2),
        }
    }
}

impl ShutdownPolicy {
    fn to_value(self) -> Value {
        serde_json::json!({
            "enabled": self.enabled,
            "minimumCycleSeconds": self.minimum_cycle_seconds,
        })
    }
}

/// Configuration snapshot handed to the worker.
///
/// Keys are top-level configuration names; values are arbitrary JSON because
/// user-data may introduce keys this crate knows nothing about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedConfig {
    values: Map<String, Value>,
}

impl ResolvedConfig {
    /// Build the base layer from fetched metadata and host defaults.
    ///
    /// Missing fields in `metadata` are recorded as empty strings.
    pub fn base<'a, I>(metadata: I, provisioner_id: &str, shutdown: ShutdownPolicy) -> Self
    where
        I: IntoIterator<Item = (MetadataField, &'a str)>,
    {
        let mut values = Map::new();
        for field in MetadataField::ALL {
            values.insert(field.config_key().to_string(), Value::String(String::new()));
        }
        for (field, text) in metadata {
            values.insert(field.config_key().to_string(), Value::String(text.to_string()));
        }
        values.insert(
            PROVISIONER_ID_KEY.to_string(),
            Value::String(provisioner_id.to_string()),
        );
        values.insert(SHUTDOWN_KEY.to_string(), shutdown.to_value());
        Self { values }
    }

    /// Apply user-data overrides on top of this configuration.
    ///
    /// Each top-level key replaces the existing value wholesale, including
    /// nested objects. Keys absent from the base layer are added.
    pub fn with_overrides(mut self, overrides: Map<String, Value>) -> Self {
        for (key, value) in overrides {
            self.values.insert(key, value);
        }
        self
    }

    /// Parse a user-data body and apply it as overrides.
    ///
    /// # Errors
    ///
    /// Returns `OverrideParse` if `text` is not JSON and `OverrideNotObject`
    /// if it is an array or string. Scalars (`null`, booleans, numbers) carry
    /// no keys and leave the configuration unchanged.
    pub fn merge_user_data(self, text: &str) -> Result<Self> {
        let parsed: Value = serde_json::from_str(text)
            .map_err(|source| HostConfigError::OverrideParse { source })?;
        match parsed {
            Value::Object(overrides) => Ok(self.with_overrides(overrides)),
            Value::Null | Value::Bool(_) | Value::Number(_) => Ok(self),
            other => Err(HostConfigError::OverrideNotObject {
                found: json_kind(&other).to_string(),
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String value for `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn host(&self) -> Option<&str> {
        self.get_str(MetadataField::Host.config_key())
    }

    pub fn worker_id(&self) -> Option<&str> {
        self.get_str(MetadataField::WorkerId.config_key())
    }

    pub fn worker_type(&self) -> Option<&str> {
        self.get_str(MetadataField::WorkerType.config_key())
    }

    pub fn worker_group(&self) -> Option<&str> {
        self.get_str(MetadataField::WorkerGroup.config_key())
    }

    pub fn worker_node_type(&self) -> Option<&str> {
        self.get_str(MetadataField::WorkerNodeType.config_key())
    }

    pub fn provisioner_id(&self) -> Option<&str> {
        self.get_str(PROVISIONER_ID_KEY)
    }

    /// Shutdown policy, if the current value is a complete policy.
    ///
    /// An override may replace `shutdown` with a partial object; that is
    /// preserved as-is in the map and reported here as `None`.
    pub fn shutdown(&self) -> Option<ShutdownPolicy> {
        self.values
            .get(SHUTDOWN_KEY)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Borrow the underlying key/value map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Consume the snapshot and return the underlying map.
    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
