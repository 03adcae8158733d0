//! Integration tests for the health client and poller

use hyper_telemetry::poller::{HealthClient, HealthError, MetricsPoller, MetricsSnapshot};
use mockito::Server;
use std::sync::Arc;
use std::time::Duration;

fn client_for(server: &Server) -> HealthClient {
    HealthClient::new(format!("{}/health", server.url()), Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_fetch_health_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"latency_p95_ms": 112, "integrations": 20, "control_checks": 44}"#)
        .create_async()
        .await;

    let snapshot = client_for(&server).fetch_snapshot().await.unwrap();
    assert_eq!(
        snapshot,
        MetricsSnapshot {
            latency_p95_ms: 112.0,
            integrations: 20,
            control_checks: 44,
        }
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_health_non_success_status() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/health")
        .with_status(500)
        .with_body(r#"{"latency_p95_ms": 1, "integrations": 1, "control_checks": 1}"#)
        .create_async()
        .await;

    let result = client_for(&server).fetch_snapshot().await;
    assert!(matches!(result, Err(HealthError::Status(s)) if s.as_u16() == 500));
}

#[tokio::test]
async fn test_fetch_health_malformed_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/health")
        .with_status(200)
        .with_body("<html>oops</html>")
        .create_async()
        .await;

    let result = client_for(&server).fetch_snapshot().await;
    assert!(matches!(result, Err(HealthError::Malformed(_))));
}

#[tokio::test]
async fn test_poller_publishes_first_snapshot() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"latency_p95_ms": 64.5, "integrations": 7, "control_checks": 12}"#)
        .create_async()
        .await;

    let source = Arc::new(client_for(&server));
    let mut handle = MetricsPoller::new(source, Duration::from_secs(5)).activate();
    assert_eq!(handle.snapshot(), MetricsSnapshot::default());

    let changed = tokio::time::timeout(Duration::from_secs(5), handle.changed()).await;
    assert!(matches!(changed, Ok(true)));
    assert_eq!(handle.snapshot().latency_p95_ms, 64.5);
    assert!(handle.view().last_success.is_some());
    handle.deactivate();
}

#[tokio::test]
async fn test_poller_keeps_default_on_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/health")
        .with_status(503)
        .create_async()
        .await;

    let source = Arc::new(client_for(&server));
    let mut handle = MetricsPoller::new(source, Duration::from_secs(5)).activate();

    let changed = tokio::time::timeout(Duration::from_secs(5), handle.changed()).await;
    assert!(matches!(changed, Ok(true)));
    assert_eq!(handle.snapshot(), MetricsSnapshot::default());
    assert_eq!(handle.view().consecutive_failures, 1);
}
