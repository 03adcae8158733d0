//! Integration tests for the event-stream client

use hyper_telemetry::sse::{SseClient, SseConfig, SseConnection, SseEvent};
use mockito::{Matcher, Server};
use std::time::Duration;

fn config_for(server: &Server, max_reconnects: u32) -> SseConfig {
    SseConfig::new(format!("{}/sse/market", server.url()))
        .max_reconnects(max_reconnects)
        .initial_delay(Duration::from_millis(10))
        .max_delay(Duration::from_millis(50))
}

async fn drain(conn: &mut SseConnection) -> Vec<SseEvent> {
    let mut events = Vec::new();
    let collect = async {
        while let Some(event) = conn.recv().await {
            events.push(event);
        }
    };
    tokio::time::timeout(Duration::from_secs(10), collect)
        .await
        .expect("stream did not stop");
    events
}

#[tokio::test]
async fn test_stream_delivers_open_messages_then_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/sse/market")
        .match_header("accept", "text/event-stream")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(": hello\n\ndata: one\n\nevent: tick\ndata: two\n\n")
        .create_async()
        .await;

    let client = SseClient::new(config_for(&server, 1)).unwrap();
    let mut conn = client.connect();
    let events = drain(&mut conn).await;

    assert_eq!(events.len(), 4, "events: {:?}", events);
    assert_eq!(events[0], SseEvent::Open);
    match &events[1] {
        SseEvent::Message(m) => {
            assert_eq!(m.data, "one");
            assert!(m.is_default_event());
        }
        other => panic!("expected message, got {:?}", other),
    }
    match &events[2] {
        SseEvent::Message(m) => assert_eq!(m.event, "tick"),
        other => panic!("expected message, got {:?}", other),
    }
    assert!(matches!(events[3], SseEvent::Error(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_stream_error_status_never_opens() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/sse/market")
        .with_status(503)
        .expect(2)
        .create_async()
        .await;

    let client = SseClient::new(config_for(&server, 2)).unwrap();
    let mut conn = client.connect();
    let events = drain(&mut conn).await;

    assert_eq!(
        events,
        vec![
            SseEvent::Error("Unexpected HTTP status: 503".into()),
            SseEvent::Error("Unexpected HTTP status: 503".into()),
        ]
    );
}

#[tokio::test]
async fn test_no_content_stops_reconnecting() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/sse/market")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let client = SseClient::new(config_for(&server, 0)).unwrap();
    let mut conn = client.connect();
    let events = drain(&mut conn).await;

    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], SseEvent::Error(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_reconnect_sends_last_event_id() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/sse/market")
        .match_header("last-event-id", Matcher::Missing)
        .with_status(200)
        .with_body("id: 7\ndata: first\n\n")
        .expect(1)
        .create_async()
        .await;
    let resumed = server
        .mock("GET", "/sse/market")
        .match_header("last-event-id", "7")
        .with_status(200)
        .with_body("data: resumed\n\n")
        .expect_at_least(1)
        .create_async()
        .await;

    let client = SseClient::new(config_for(&server, 0)).unwrap();
    let mut conn = client.connect();

    let mut data = Vec::new();
    let collect = async {
        while let Some(event) = conn.recv().await {
            if let SseEvent::Message(m) = event {
                data.push((m.data, m.id));
                if data.len() == 2 {
                    break;
                }
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(10), collect)
        .await
        .expect("did not reconnect");
    conn.close();

    assert_eq!(data[0], ("first".to_string(), Some("7".to_string())));
    assert_eq!(data[1], ("resumed".to_string(), Some("7".to_string())));
    first.assert_async().await;
    resumed.assert_async().await;
}

#[tokio::test]
async fn test_reconnect_ignores_id_of_incomplete_event() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/sse/market")
        .match_header("last-event-id", Matcher::Missing)
        .with_status(200)
        .with_body("id: 7\ndata: first\n\nid: 8\ndata: cut")
        .expect(1)
        .create_async()
        .await;
    let resumed = server
        .mock("GET", "/sse/market")
        .match_header("last-event-id", "7")
        .with_status(200)
        .with_body("data: resumed\n\n")
        .expect_at_least(1)
        .create_async()
        .await;

    let client = SseClient::new(config_for(&server, 0)).unwrap();
    let mut conn = client.connect();

    let mut data = Vec::new();
    let collect = async {
        while let Some(event) = conn.recv().await {
            if let SseEvent::Message(m) = event {
                data.push(m.data);
                if data.len() == 2 {
                    break;
                }
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(10), collect)
        .await
        .expect("did not resume from the last complete event");
    conn.close();

    assert_eq!(data, vec!["first", "resumed"]);
    first.assert_async().await;
    resumed.assert_async().await;
}
