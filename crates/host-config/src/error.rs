//! Error types for host configuration resolution

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HostConfigError>;

/// Errors surfaced while resolving host configuration.
///
/// Non-success HTTP statuses are not errors: fetchers turn them into empty
/// text. Only conditions the caller must act on end up here.
#[derive(Error, Debug)]
pub enum HostConfigError {
    /// Connection, DNS, timeout or body read failure talking to the metadata service
    #[error("transport error fetching {url}")]
    Transport {
        url: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// User-data was present but is not valid JSON
    #[error("user-data override is not valid JSON: {source}")]
    OverrideParse {
        #[source]
        source: serde_json::Error,
    },

    /// User-data parsed as a JSON array or string instead of an object
    #[error("user-data override must be a JSON object, found {found}")]
    OverrideNotObject { found: String },

    /// Invalid settings (environment or TOML)
    #[error("host config error: {message}")]
    Config { message: String },

    /// Provider lookup or construction failed
    #[error("provider error: {message}")]
    Provider {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl HostConfigError {
    /// Build a transport error for `url` from any underlying error.
    pub fn transport<E>(url: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            url: url.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error came from the transport layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display_includes_url() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = HostConfigError::transport("http://169.254.169.254/latest/user-data", io);
        assert!(err.is_transport());
        assert_eq!(
            err.to_string(),
            "transport error fetching http://169.254.169.254/latest/user-data"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_override_parse_error_is_not_transport() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = HostConfigError::OverrideParse { source };
        assert!(!err.is_transport());
        assert!(err.to_string().starts_with("user-data override is not valid JSON"));
    }
}
