//! End-to-end tests: mock backend through chart and render

use hyper_telemetry::chart::{ConnectionStatus, StreamingChart};
use hyper_telemetry::config::Config;
use hyper_telemetry::render::{render_chart, render_svg};
use hyper_telemetry::sse::{SseClient, SseConfig};
use mockito::Server;
use std::time::Duration;

#[test]
fn test_config_example_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example");
    let config = Config::load(path).unwrap();
    assert_eq!(config.backend.base_url, "http://localhost:8000");
    assert_eq!(config.poller.interval_ms, 5000);
    assert_eq!(config.chart.window_capacity, 121);
}

#[tokio::test]
async fn test_chart_over_mock_stream() {
    let body = [
        r#"data: {"payload":{"bar":{"t":0,"c":10}}}"#,
        r#"data: {"payload":{"bar":{"t":1,"c":20}}}"#,
        "data: not-json",
        r#"data: {"payload":{"quote":{"bid":1}}}"#,
        r#"data: {"payload":{"bar":{"t":2,"c":15}}}"#,
    ]
    .iter()
    .map(|line| format!("{}\n\n", line))
    .collect::<String>();

    let mut server = Server::new_async().await;
    server
        .mock("GET", "/sse/market")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let sse = SseConfig::new(format!("{}/sse/market", server.url()))
        .max_reconnects(1)
        .initial_delay(Duration::from_millis(10));
    let client = SseClient::new(sse).unwrap();
    let mut handle = StreamingChart::new().activate(client.connect());

    // Runs until the transport gives up and the chart loop ends
    tokio::time::timeout(Duration::from_secs(10), async {
        while handle.changed().await {}
    })
    .await
    .expect("chart did not settle");

    let view = handle.view();
    assert_eq!(view.status, ConnectionStatus::Disconnected);
    assert_eq!(view.samples, 3);
    assert_eq!(view.projection.d, "M 0.0 80.0 L 140.0 0.0 L 280.0 40.0");

    let out = render_chart(&view);
    assert!(out.starts_with("Live Demo  [disconnected]  (3 samples)"));
    assert!(out.ends_with(&render_svg(&view.projection)));
}
