//! Error scenario tests for host configuration resolution

mod support;

use std::sync::Arc;
use std::time::Duration;
use support::{MetadataStub, Route, full_metadata};
use worker_host_config::{
    AwsHost, FixedUptime, HostConfigError, HostFactory, HostProvider, HostRegistry, HostSettings,
    HttpTextFetcher, MockHost, resolve_host_config,
};

const SHORT_TIMEOUT: Duration = Duration::from_millis(250);

fn host_with_timeout(base_url: &str, timeout: Duration) -> AwsHost<HttpTextFetcher, FixedUptime> {
    let fetcher = HttpTextFetcher::new(timeout).unwrap();
    AwsHost::new(fetcher, FixedUptime(0)).with_base_url(base_url)
}

/// Base URL of a port nothing is listening on.
async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/latest")
}

#[tokio::test]
async fn test_malformed_user_data_aborts_resolution() {
    let mut routes = full_metadata();
    routes.push(("/user-data", Route::ok("{not json")));
    let stub = MetadataStub::start(routes).await;

    let result = host_with_timeout(&stub.base_url(), Duration::from_secs(5))
        .configure()
        .await;

    match result {
        Err(HostConfigError::OverrideParse { .. }) => {}
        other => panic!("expected OverrideParse, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let base_url = closed_port_url().await;

    let err = host_with_timeout(&base_url, Duration::from_secs(5))
        .configure()
        .await
        .unwrap_err();

    assert!(err.is_transport(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_termination_time_tolerates_connection_refused() {
    let base_url = closed_port_url().await;

    let text = host_with_timeout(&base_url, Duration::from_secs(5))
        .termination_time()
        .await
        .unwrap();

    assert_eq!(text, "");
}

#[tokio::test]
async fn test_slow_identity_field_times_out() {
    let mut routes = full_metadata();
    routes.retain(|(path, _)| *path != "/meta-data/instance-id");
    routes.push((
        "/meta-data/instance-id",
        Route::ok("i-slow").delayed(Duration::from_secs(3)),
    ));
    let stub = MetadataStub::start(routes).await;

    let err = host_with_timeout(&stub.base_url(), SHORT_TIMEOUT)
        .configure()
        .await
        .unwrap_err();

    match err {
        HostConfigError::Transport { url, .. } => assert!(url.ends_with("/meta-data/instance-id")),
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_optional_field_degrades_to_empty() {
    let mut routes = full_metadata();
    routes.retain(|(path, _)| *path != "/meta-data/ami-id");
    routes.push((
        "/meta-data/ami-id",
        Route::ok("ami-slow").delayed(Duration::from_secs(3)),
    ));
    let stub = MetadataStub::start(routes).await;

    let config = host_with_timeout(&stub.base_url(), SHORT_TIMEOUT)
        .configure()
        .await
        .unwrap();

    assert_eq!(config.worker_type(), Some(""));
    assert_eq!(config.worker_id(), Some("i-07d3a0b1c2d3e4f50"));
}

#[tokio::test]
async fn test_unknown_provider_is_rejected() {
    let settings = HostSettings {
        provider: "packet".to_string(),
        ..HostSettings::default()
    };

    let err = resolve_host_config(&settings).await.unwrap_err();
    assert!(matches!(err, HostConfigError::Provider { .. }));
    assert!(err.to_string().contains("'packet' not registered"));
}

#[tokio::test]
async fn test_registry_provider_error_propagates() {
    let mut registry = HostRegistry::with_builtin();
    registry.register(HostFactory {
        name: "flaky".to_string(),
        description: "always fails".to_string(),
        create: Arc::new(
            |_settings: &HostSettings| -> worker_host_config::Result<
                Box<dyn worker_host_config::ErasedHostProvider>,
            > {
                Ok(Box::new(
                    MockHost::new().with_error("metadata offline".to_string()),
                ))
            },
        ),
    });

    let provider = registry
        .create_provider("flaky", &HostSettings::default())
        .unwrap();
    let err = provider.configure().await.unwrap_err();
    assert!(err.to_string().contains("metadata offline"));
    assert_eq!(provider.termination_time().await.unwrap_err().to_string(), err.to_string());
}
